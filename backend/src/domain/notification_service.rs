//! Notification inbox for the caller and fan-out to team members.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::domain::action::ActionContext;
use crate::domain::ports::{
    NotificationPersistenceError, NotificationRepository, TeamPersistenceError, TeamRepository,
};
use crate::domain::{Error, Notification, NotificationId, Permission, TeamId, UserId};

/// Reads and acknowledges notifications; raises them for team events.
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    teams: Arc<dyn TeamRepository>,
}

impl NotificationService {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        teams: Arc<dyn TeamRepository>,
    ) -> Self {
        Self {
            notifications,
            teams,
        }
    }

    fn map_notification_error(error: NotificationPersistenceError) -> Error {
        match error {
            NotificationPersistenceError::Connection { message } => Error::service_unavailable(
                format!("notification repository unavailable: {message}"),
            ),
            NotificationPersistenceError::Query { message } => {
                Error::internal(format!("notification repository error: {message}"))
            }
        }
    }

    fn map_team_error(error: TeamPersistenceError) -> Error {
        match error {
            TeamPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("team repository unavailable: {message}"))
            }
            TeamPersistenceError::Query { message } => {
                Error::internal(format!("team repository error: {message}"))
            }
        }
    }

    /// The caller's notifications in the active team, newest first.
    pub async fn list(&self, context: &ActionContext) -> Result<Vec<Notification>, Error> {
        context.ensure(Permission::NotificationsRead)?;
        let mut notifications = self
            .notifications
            .list_for(&context.team_id(), &context.user_id())
            .await
            .map_err(Self::map_notification_error)?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    /// Mark one notification read. Repeating the call is harmless.
    pub async fn mark_read(
        &self,
        context: &ActionContext,
        id: NotificationId,
    ) -> Result<Notification, Error> {
        context.ensure(Permission::NotificationsRead)?;
        let notification = self
            .notifications
            .find(&id)
            .await
            .map_err(Self::map_notification_error)?
            .filter(|found| found.is_addressed_to(context.team_id(), context.user_id()))
            .ok_or_else(|| {
                Error::not_found("Notification not found")
                    .with_details(json!({ "notificationId": id }))
            })?;
        if notification.is_read() {
            return Ok(notification);
        }
        let now = Utc::now();
        self.notifications
            .mark_read(&id, now)
            .await
            .map_err(Self::map_notification_error)?;
        Ok(Notification {
            read_at: Some(now),
            ..notification
        })
    }

    /// Mark every unread notification read and return how many changed.
    pub async fn mark_all_read(&self, context: &ActionContext) -> Result<usize, Error> {
        context.ensure(Permission::NotificationsRead)?;
        self.notifications
            .mark_all_read(&context.team_id(), &context.user_id(), Utc::now())
            .await
            .map_err(Self::map_notification_error)
    }

    /// Notify every member of `team_id` except `except`.
    pub async fn notify_team(
        &self,
        team_id: TeamId,
        except: UserId,
        title: &str,
        body: &str,
    ) -> Result<usize, Error> {
        let now = Utc::now();
        let notifications: Vec<_> = self
            .teams
            .members(&team_id)
            .await
            .map_err(Self::map_team_error)?
            .into_iter()
            .filter(|member| member.user_id != except)
            .map(|member| Notification::new(team_id, member.user_id, title, body, now))
            .collect();
        let count = notifications.len();
        if count > 0 {
            self.notifications
                .insert_many(notifications)
                .await
                .map_err(Self::map_notification_error)?;
        }
        debug!(team_id = %team_id, count, "team notified");
        Ok(count)
    }
}
