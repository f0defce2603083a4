//! Context resolution backed by the user and team repositories.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::action::{ActionContext, ContextError, ContextResolver, SessionClaims};
use crate::domain::ports::{TeamRepository, UserRepository};
use crate::domain::{Membership, UserId, get_user_permissions};

/// Resolves the session user, their active team membership and effective
/// permissions.
///
/// When the session names no team the user's oldest membership is used.
#[derive(Clone)]
pub struct MembershipContextResolver {
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
}

impl MembershipContextResolver {
    pub fn new(users: Arc<dyn UserRepository>, teams: Arc<dyn TeamRepository>) -> Self {
        Self { users, teams }
    }

    async fn active_membership(
        &self,
        session: &SessionClaims,
        user_id: &UserId,
    ) -> Result<Membership, ContextError> {
        match session.team_id {
            Some(team_id) => self
                .teams
                .find_membership(&team_id, user_id)
                .await
                .map_err(unavailable)?
                .ok_or(ContextError::NotAMember),
            None => self
                .teams
                .memberships_for_user(user_id)
                .await
                .map_err(unavailable)?
                .into_iter()
                .next()
                .ok_or(ContextError::NoTeam),
        }
    }
}

fn unavailable(error: impl std::fmt::Display) -> ContextError {
    ContextError::Unavailable {
        message: error.to_string(),
    }
}

#[async_trait]
impl ContextResolver for MembershipContextResolver {
    async fn resolve(&self, session: &SessionClaims) -> Result<ActionContext, ContextError> {
        let user_id = session.user_id.ok_or(ContextError::NoSession)?;
        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(unavailable)?
            .ok_or(ContextError::UnknownUser)?;
        let membership = self.active_membership(session, &user_id).await?;
        let team = self
            .teams
            .find_team(&membership.team_id)
            .await
            .map_err(unavailable)?
            .ok_or(ContextError::NotAMember)?;
        debug!(user_id = %user_id, team_id = %team.id(), role = ?membership.role, "context resolved");
        Ok(ActionContext::new(
            user,
            team,
            membership.role,
            get_user_permissions(&membership),
        ))
    }
}
