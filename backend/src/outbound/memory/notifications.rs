use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{NotificationPersistenceError, NotificationRepository};
use crate::domain::{Notification, NotificationId, TeamId, UserId};

/// Notifications for every team and user.
#[derive(Debug, Default)]
pub struct InMemoryNotificationRepository {
    items: RwLock<Vec<Notification>>,
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn insert_many(
        &self,
        notifications: Vec<Notification>,
    ) -> Result<(), NotificationPersistenceError> {
        self.items.write().await.extend(notifications);
        Ok(())
    }

    async fn list_for(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationPersistenceError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|n| n.is_addressed_to(*team_id, *user_id))
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationPersistenceError> {
        Ok(self.items.read().await.iter().find(|n| n.id == *id).cloned())
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        at: DateTime<Utc>,
    ) -> Result<(), NotificationPersistenceError> {
        if let Some(notification) = self
            .items
            .write()
            .await
            .iter_mut()
            .find(|n| n.id == *id && n.read_at.is_none())
        {
            notification.read_at = Some(at);
        }
        Ok(())
    }

    async fn mark_all_read(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<usize, NotificationPersistenceError> {
        let mut items = self.items.write().await;
        let mut changed = 0;
        for notification in items
            .iter_mut()
            .filter(|n| n.is_addressed_to(*team_id, *user_id) && !n.is_read())
        {
            notification.read_at = Some(at);
            changed += 1;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn mark_all_read_counts_only_unread_for_user() {
        let repo = InMemoryNotificationRepository::default();
        let team = TeamId::random();
        let user = UserId::random();
        let mut read = Notification::new(team, user, "a", "b", Utc::now());
        read.read_at = Some(Utc::now());
        repo.insert_many(vec![
            read,
            Notification::new(team, user, "c", "d", Utc::now()),
            Notification::new(team, UserId::random(), "e", "f", Utc::now()),
        ])
        .await
        .expect("insert");

        assert_eq!(repo.mark_all_read(&team, &user, Utc::now()).await.expect("mark"), 1);
        assert_eq!(repo.mark_all_read(&team, &user, Utc::now()).await.expect("mark"), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn mark_read_keeps_first_timestamp() {
        let repo = InMemoryNotificationRepository::default();
        let notification = Notification::new(TeamId::random(), UserId::random(), "a", "b", Utc::now());
        let id = notification.id;
        repo.insert_many(vec![notification]).await.expect("insert");
        let first = Utc::now();
        repo.mark_read(&id, first).await.expect("mark");
        repo.mark_read(&id, first + chrono::Duration::minutes(1))
            .await
            .expect("mark again");
        let stored = repo.find(&id).await.expect("find").expect("exists");
        assert_eq!(stored.read_at, Some(first));
    }
}
