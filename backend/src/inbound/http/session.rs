//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting a login, selecting a team and
//! reading the [`SessionClaims`] handed to the action pipeline.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::action::SessionClaims;
use crate::domain::{Error, TeamId, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const TEAM_ID_KEY: &str = "team_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start a fresh session for `user_id`, dropping any previous state.
    pub fn persist_login(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0.remove(TEAM_ID_KEY);
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Remember the active team.
    pub fn select_team(&self, team_id: TeamId) -> Result<(), Error> {
        self.0
            .insert(TEAM_ID_KEY, team_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Forget everything and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Identity claims for the action pipeline.
    ///
    /// Unreadable or tampered values are dropped with a warning, so a broken
    /// cookie simply looks anonymous.
    pub fn claims(&self) -> SessionClaims {
        SessionClaims {
            user_id: self.read(USER_ID_KEY, UserId::new),
            team_id: self.read(TEAM_ID_KEY, TeamId::new),
        }
    }

    fn read<T, E: std::fmt::Display>(
        &self,
        key: &str,
        parse: impl FnOnce(String) -> Result<T, E>,
    ) -> Option<T> {
        let raw = match self.0.get::<String>(key) {
            Ok(raw) => raw?,
            Err(error) => {
                warn!(key, %error, "unreadable session value ignored");
                return None;
            }
        };
        match parse(raw) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(key, %error, "invalid session value ignored");
                None
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
