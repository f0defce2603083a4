use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserAccount, UserPersistenceError, UserRepository};
use crate::domain::{Email, User, UserId};

/// User accounts keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<HashMap<UserId, UserAccount>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn upsert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut accounts = self.accounts.write().await;
        let email_taken = accounts.values().any(|existing| {
            existing.user.id() != account.user.id() && existing.user.email() == account.user.email()
        });
        if email_taken {
            return Err(UserPersistenceError::query(format!(
                "email {} already belongs to another user",
                account.user.email()
            )));
        }
        accounts.insert(account.user.id(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .accounts
            .read()
            .await
            .get(id)
            .map(|account| account.user.clone()))
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| account.user.email() == email)
            .cloned())
    }
}
