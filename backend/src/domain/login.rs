//! Password login against stored argon2 hashes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{LoginService, UserPersistenceError, UserRepository};
use crate::domain::{
    Error, LoginCredentials, PasswordError, PasswordHash, UserId, hash_password, verify_password,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// [`LoginService`] that checks credentials against the user repository.
///
/// Unknown emails are verified against a throwaway hash so both failure
/// paths cost one argon2 verification.
#[derive(Clone)]
pub struct PasswordLoginService {
    users: Arc<dyn UserRepository>,
    decoy: PasswordHash,
}

impl PasswordLoginService {
    pub fn new(users: Arc<dyn UserRepository>) -> Result<Self, PasswordError> {
        Ok(Self {
            users,
            decoy: hash_password("decoy password for unknown accounts")?,
        })
    }

    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
        }
    }
}

async fn verify_off_thread(password: &str, hash: PasswordHash) -> Result<bool, Error> {
    let password = Zeroizing::new(password.to_owned());
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|err| Error::internal(format!("password verification aborted: {err}")))
}

#[async_trait]
impl LoginService for PasswordLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let account = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_persistence_error)?;

        let Some(account) = account else {
            verify_off_thread(credentials.password(), self.decoy.clone()).await?;
            info!("login rejected for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        if verify_off_thread(credentials.password(), account.password_hash).await? {
            Ok(account.user.id())
        } else {
            warn!(user_id = %account.user.id(), "login rejected: wrong password");
            Err(Error::unauthorized(INVALID_CREDENTIALS))
        }
    }
}
