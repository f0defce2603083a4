//! Port for notification storage.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Notification, NotificationId, TeamId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert_many(
        &self,
        notifications: Vec<Notification>,
    ) -> Result<(), NotificationPersistenceError>;

    /// Notifications for `user_id` in `team_id`, in any order.
    async fn list_for(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationPersistenceError>;

    async fn find(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationPersistenceError>;

    /// Set `read_at` if unset. Unknown ids are ignored.
    async fn mark_read(
        &self,
        id: &NotificationId,
        at: DateTime<Utc>,
    ) -> Result<(), NotificationPersistenceError>;

    /// Mark every unread notification for the user as read and return how
    /// many changed.
    async fn mark_all_read(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<usize, NotificationPersistenceError>;
}
