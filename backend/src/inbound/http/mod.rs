//! HTTP inbound adapter exposing the action endpoints.
//!
//! Every action handler answers with an action envelope; see [`envelope`]
//! for the status mapping.

pub mod catalog;
pub mod envelope;
pub mod error;
pub mod health;
pub mod notifications;
pub mod session;
pub mod state;
pub mod team;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::{HttpRequest, web};

use crate::domain::action::{ActionError, ActionResult, code};

/// Register every `/api/v1` action route on `cfg`.
///
/// Catalog routes constrain their kind segment, so registration order does
/// not matter.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(users::switch_team)
        .service(team::list_members)
        .service(team::update_member_role)
        .service(team::permission_matrix)
        .service(notifications::list_notifications)
        .service(notifications::mark_all_read)
        .service(notifications::mark_read)
        .service(catalog::list_items)
        .service(catalog::create_item)
        .service(catalog::update_item)
        .service(catalog::delete_item);
}

/// Fallback for unmatched paths: a `NOT_FOUND` failure envelope.
pub async fn route_not_found(req: HttpRequest) -> ActionResult<()> {
    ActionResult::failure(
        ActionError::new("No such route")
            .with_code(code::NOT_FOUND)
            .with_detail("path", req.path()),
    )
}
