//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every action endpoint, the health probes, the
//! envelope error shape and the session cookie security scheme. Swagger UI
//! serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::action::ActionError;
use crate::domain::{
    CatalogItem, CatalogKind, Error, ErrorCode, Notification, Permission, PermissionMatrix,
    PermissionMatrixRow, Role, Team, TeamMember, User, UserProfile,
};
use crate::inbound::http::catalog::CatalogItemRequest;
use crate::inbound::http::notifications::ReadAllResponse;
use crate::inbound::http::team::UpdateRoleRequest;
use crate::inbound::http::users::{LoginRequest, SwitchTeamRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
///
/// Every action responds with `{ "success": true, "data": ... }` or
/// `{ "success": false, "error": ActionError }`; response bodies below name
/// the `data` payload.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Estimator API",
        description = "Team-scoped works and materials catalogs behind session-authenticated actions."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::switch_team,
        crate::inbound::http::team::list_members,
        crate::inbound::http::team::update_member_role,
        crate::inbound::http::team::permission_matrix,
        crate::inbound::http::catalog::list_items,
        crate::inbound::http::catalog::create_item,
        crate::inbound::http::catalog::update_item,
        crate::inbound::http::catalog::delete_item,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::notifications::mark_all_read,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ActionError,
        Error,
        ErrorCode,
        User,
        UserProfile,
        Team,
        TeamMember,
        Role,
        Permission,
        PermissionMatrix,
        PermissionMatrixRow,
        CatalogKind,
        CatalogItem,
        Notification,
        LoginRequest,
        SwitchTeamRequest,
        UpdateRoleRequest,
        CatalogItemRequest,
        ReadAllResponse,
    )),
    tags(
        (name = "session", description = "Login, logout and the active team"),
        (name = "team", description = "Team members and role permissions"),
        (name = "catalog", description = "Works and materials catalogs"),
        (name = "notifications", description = "In-app notifications"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
