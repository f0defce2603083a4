//! Caller context resolved before every action.

use async_trait::async_trait;
use serde_json::json;

use super::{ActionFault, code};
use crate::domain::{Error, Permission, PermissionSet, Role, Team, TeamId, User, UserId};

/// Identity carried by the session cookie, read once per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: Option<UserId>,
    /// Active team; `None` falls back to the user's first membership.
    pub team_id: Option<TeamId>,
}

impl SessionClaims {
    /// Claims without a signed-in user.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Claims for `user_id` with no explicit team selected.
    #[must_use]
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            team_id: None,
        }
    }

    /// Select the active team.
    #[must_use]
    pub fn with_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }
}

/// Resolved caller identity handed to an operation by value.
///
/// Built fresh for each invocation and dropped when the operation returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    user: User,
    team: Team,
    role: Role,
    permissions: PermissionSet,
}

impl ActionContext {
    /// Context for `user` acting in `team` with `role`.
    pub fn new(user: User, team: Team, role: Role, permissions: PermissionSet) -> Self {
        Self {
            user,
            team,
            role,
            permissions,
        }
    }

    /// Signed-in user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Active team.
    pub fn team(&self) -> &Team {
        &self.team
    }

    /// Shorthand for `self.user().id()`.
    pub fn user_id(&self) -> UserId {
        self.user.id()
    }

    /// Shorthand for `self.team().id()`.
    pub fn team_id(&self) -> TeamId {
        self.team.id()
    }

    /// Caller's role in the active team.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Permissions derived from [`Self::role`].
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Whether the caller holds `permission` in the active team.
    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Fail with a forbidden error unless the caller holds `permission`.
    pub fn ensure(&self, permission: Permission) -> Result<(), Error> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(Error::forbidden("You do not have permission to perform this action")
                .with_details(json!({ "permission": permission })))
        }
    }
}

/// Why a context could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The session carries no user id.
    #[error("no authenticated session")]
    NoSession,
    /// The session's user was deleted.
    #[error("session user no longer exists")]
    UnknownUser,
    /// The user has no membership at all.
    #[error("user does not belong to any team")]
    NoTeam,
    /// The selected team does not list the user.
    #[error("user is not a member of the selected team")]
    NotAMember,
    /// A backing store failed.
    #[error("context lookup failed: {message}")]
    Unavailable { message: String },
}

impl ContextError {
    /// True for every variant caused by the caller's session rather than by
    /// the backing stores.
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, Self::Unavailable { .. })
    }
}

impl From<ContextError> for ActionFault {
    fn from(error: ContextError) -> Self {
        if error.is_unauthenticated() {
            Self::rejected(code::UNAUTHENTICATED, "Authentication required")
        } else {
            Self::internal(error)
        }
    }
}

/// Resolves session claims into an [`ActionContext`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContextResolver: Send + Sync {
    /// Build the context for `session`, or say why none exists.
    async fn resolve(&self, session: &SessionClaims) -> Result<ActionContext, ContextError>;
}
