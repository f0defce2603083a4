//! Team membership and permission handlers.
//!
//! ```text
//! GET /api/v1/team/members
//! PUT /api/v1/team/members/{userId}/role {"role":"estimator"}
//! GET /api/v1/team/permissions
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::action::{ActionFault, ActionOptions, ActionResult};
use crate::domain::{PermissionMatrix, Role, TeamMember, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for `PUT /api/v1/team/members/{userId}/role`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// Members of the active team with their effective permissions.
#[utoipa::path(
    get,
    path = "/api/v1/team/members",
    responses(
        (status = 200, description = "Envelope carrying the members", body = [TeamMember]),
        (status = 401, description = "No session"),
        (status = 403, description = "Missing team read permission")
    ),
    tags = ["team"],
    operation_id = "listTeamMembers"
)]
#[get("/team/members")]
pub async fn list_members(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ActionResult<Vec<TeamMember>> {
    let teams = &state.teams;
    state
        .pipeline
        .wrap(ActionOptions::named("team.members"), move |ctx, (): ()| async move {
            teams.members(&ctx).await.map_err(ActionFault::from)
        })
        .call(&session.claims(), ())
        .await
}

/// Change a member's role.
#[utoipa::path(
    put,
    path = "/api/v1/team/members/{userId}/role",
    params(("userId" = String, Path, description = "Member user id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Envelope carrying the updated member", body = TeamMember),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "No session"),
        (status = 403, description = "Missing team manage permission"),
        (status = 404, description = "No such member"),
        (status = 409, description = "Would demote the last owner")
    ),
    tags = ["team"],
    operation_id = "updateMemberRole"
)]
#[put("/team/members/{user_id}/role")]
pub async fn update_member_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateRoleRequest>,
) -> ActionResult<TeamMember> {
    let teams = &state.teams;
    state
        .pipeline
        .wrap(
            ActionOptions::named("team.updateRole"),
            move |ctx, (user_id, role): (String, Role)| async move {
                let user_id = UserId::new(&user_id).map_err(|err| {
                    ActionFault::validation(err.to_string()).with_detail("field", "userId")
                })?;
                teams
                    .update_member_role(&ctx, user_id, role)
                    .await
                    .map_err(ActionFault::from)
            },
        )
        .call(&session.claims(), (path.into_inner(), payload.into_inner().role))
        .await
}

/// Default permissions of every role, for the permissions page.
#[utoipa::path(
    get,
    path = "/api/v1/team/permissions",
    responses(
        (status = 200, description = "Envelope carrying the role matrix", body = PermissionMatrix),
        (status = 401, description = "No session")
    ),
    tags = ["team"],
    operation_id = "permissionMatrix"
)]
#[get("/team/permissions")]
pub async fn permission_matrix(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ActionResult<PermissionMatrix> {
    state
        .pipeline
        .wrap(ActionOptions::named("team.permissions"), |_ctx, (): ()| async {
            Ok::<_, ActionFault>(PermissionMatrix::standard())
        })
        .call(&session.claims(), ())
        .await
}
