//! Notification inbox handlers.
//!
//! ```text
//! GET  /api/v1/notifications
//! POST /api/v1/notifications/{id}/read
//! POST /api/v1/notifications/read-all
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::action::{ActionFault, ActionOptions, ActionResult, plain_action_data};
use crate::domain::{Notification, NotificationId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Result of `POST /api/v1/notifications/read-all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadAllResponse {
    /// Notifications that were unread before the call.
    pub updated: usize,
}

plain_action_data!(ReadAllResponse);

/// The caller's notifications in the active team, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Envelope carrying the notifications", body = [Notification]),
        (status = 401, description = "No session")
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ActionResult<Vec<Notification>> {
    let notifications = &state.notifications;
    state
        .pipeline
        .wrap(ActionOptions::named("notifications.list"), move |ctx, (): ()| async move {
            Ok::<_, ActionFault>(notifications.list(&ctx).await?)
        })
        .call(&session.claims(), ())
        .await
}

/// Mark one notification read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Envelope carrying the notification", body = Notification),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "No session"),
        (status = 404, description = "Not one of the caller's notifications")
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ActionResult<Notification> {
    let notifications = &state.notifications;
    state
        .pipeline
        .wrap(
            ActionOptions::named("notifications.markRead"),
            move |ctx, id: NotificationId| async move {
                Ok::<_, ActionFault>(notifications.mark_read(&ctx, id).await?)
            },
        )
        .call(&session.claims(), NotificationId::from_uuid(path.into_inner()))
        .await
}

/// Mark every unread notification read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    responses(
        (status = 200, description = "Envelope carrying the number updated", body = ReadAllResponse),
        (status = 401, description = "No session")
    ),
    tags = ["notifications"],
    operation_id = "markAllNotificationsRead"
)]
#[post("/notifications/read-all")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ActionResult<ReadAllResponse> {
    let notifications = &state.notifications;
    state
        .pipeline
        .wrap(
            ActionOptions::named("notifications.markAllRead"),
            move |ctx, (): ()| async move {
                let updated = notifications.mark_all_read(&ctx).await?;
                Ok::<_, ActionFault>(ReadAllResponse { updated })
            },
        )
        .call(&session.claims(), ())
        .await
}
