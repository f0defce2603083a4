//! Team membership management and the caller's profile.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::action::{ActionContext, ActionFault, code, plain_action_data};
use crate::domain::ports::{
    RoleChange, TeamPersistenceError, TeamRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Membership, Permission, PermissionSet, Role, Team, TeamId, User, UserId, get_user_permissions,
};

/// The signed-in user as seen from their active team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user: User,
    pub team: Team,
    pub role: Role,
    pub permissions: PermissionSet,
}

impl From<&ActionContext> for UserProfile {
    fn from(context: &ActionContext) -> Self {
        Self {
            user: context.user().clone(),
            team: context.team().clone(),
            role: context.role(),
            permissions: context.permissions().clone(),
        }
    }
}

/// A team member with their effective permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub user: User,
    pub role: Role,
    pub permissions: PermissionSet,
}

plain_action_data!(UserProfile, TeamMember, Team);

/// Failures raised by [`TeamService`].
#[derive(Debug, thiserror::Error)]
pub enum TeamError {
    #[error("missing permission {permission:?}")]
    Forbidden { permission: Permission },
    #[error("only owners can grant or revoke ownership")]
    OwnerOnly,
    #[error("user {user_id} is not a member of this team")]
    MemberNotFound { user_id: UserId },
    #[error("team {team_id} not found")]
    TeamNotFound { team_id: TeamId },
    #[error("the last owner cannot be demoted")]
    LastOwner,
    #[error("the member's role changed to {current:?} meanwhile")]
    RoleChanged { current: Role },
    #[error(transparent)]
    Teams(#[from] TeamPersistenceError),
    #[error(transparent)]
    Users(#[from] UserPersistenceError),
}

impl From<TeamError> for ActionFault {
    fn from(error: TeamError) -> Self {
        match error {
            TeamError::Forbidden { permission } => ActionFault::rejected(
                code::FORBIDDEN,
                "You do not have permission to perform this action",
            )
            .with_detail("permission", serde_json::json!(permission)),
            TeamError::OwnerOnly => {
                ActionFault::rejected(code::FORBIDDEN, "Only an owner can change ownership")
            }
            TeamError::MemberNotFound { user_id } => {
                ActionFault::rejected(code::NOT_FOUND, "Team member not found")
                    .with_detail("userId", user_id.to_string())
            }
            TeamError::TeamNotFound { team_id } => {
                ActionFault::rejected(code::NOT_FOUND, "Team not found")
                    .with_detail("teamId", team_id.to_string())
            }
            TeamError::LastOwner => ActionFault::rejected(
                code::LAST_OWNER,
                "A team must keep at least one owner",
            ),
            TeamError::RoleChanged { current } => ActionFault::rejected(
                code::CONFLICT,
                "The member's role changed in the meantime; reload and try again",
            )
            .with_detail("currentRole", serde_json::json!(current)),
            TeamError::Teams(source) => ActionFault::internal(source),
            TeamError::Users(source) => ActionFault::internal(source),
        }
    }
}

/// Membership queries and role changes for the caller's active team.
#[derive(Clone)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
}

impl TeamService {
    pub fn new(teams: Arc<dyn TeamRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { teams, users }
    }

    fn require(context: &ActionContext, permission: Permission) -> Result<(), TeamError> {
        if context.can(permission) {
            Ok(())
        } else {
            Err(TeamError::Forbidden { permission })
        }
    }

    async fn to_member(&self, membership: &Membership) -> Result<Option<TeamMember>, TeamError> {
        let Some(user) = self.users.find_by_id(&membership.user_id).await? else {
            warn!(user_id = %membership.user_id, "membership references a missing user");
            return Ok(None);
        };
        Ok(Some(TeamMember {
            user,
            role: membership.role,
            permissions: get_user_permissions(membership),
        }))
    }

    /// Members of the active team ordered by role, then display name.
    pub async fn members(&self, context: &ActionContext) -> Result<Vec<TeamMember>, TeamError> {
        Self::require(context, Permission::TeamRead)?;
        let memberships = self.teams.members(&context.team_id()).await?;
        let mut members = Vec::with_capacity(memberships.len());
        for membership in &memberships {
            if let Some(member) = self.to_member(membership).await? {
                members.push(member);
            }
        }
        members.sort_by(|a, b| {
            a.role
                .cmp(&b.role)
                .then_with(|| a.user.display_name().as_ref().cmp(b.user.display_name().as_ref()))
        });
        Ok(members)
    }

    /// Change a member's role.
    ///
    /// Ownership can only be granted or revoked by an owner, and the last
    /// owner can never be demoted.
    pub async fn update_member_role(
        &self,
        context: &ActionContext,
        user_id: UserId,
        role: Role,
    ) -> Result<TeamMember, TeamError> {
        Self::require(context, Permission::TeamManage)?;
        let team_id = context.team_id();
        let membership = self
            .teams
            .find_membership(&team_id, &user_id)
            .await?
            .ok_or(TeamError::MemberNotFound { user_id })?;

        let touches_ownership = membership.role == Role::Owner || role == Role::Owner;
        if touches_ownership && context.role() != Role::Owner {
            return Err(TeamError::OwnerOnly);
        }
        let updated = match self
            .teams
            .change_role(&team_id, &user_id, membership.role, role)
            .await?
        {
            RoleChange::Changed(updated) => updated,
            RoleChange::NotAMember => return Err(TeamError::MemberNotFound { user_id }),
            RoleChange::Stale { current } => return Err(TeamError::RoleChanged { current }),
            RoleChange::LastOwner => return Err(TeamError::LastOwner),
        };
        info!(team_id = %team_id, user_id = %user_id, role = ?role, "member role updated");
        self.to_member(&updated)
            .await?
            .ok_or(TeamError::MemberNotFound { user_id })
    }

    /// Check that the caller may switch to `team_id` and return it.
    pub async fn switch_team(
        &self,
        context: &ActionContext,
        team_id: TeamId,
    ) -> Result<Team, TeamError> {
        self.teams
            .find_membership(&team_id, &context.user_id())
            .await?
            .ok_or(TeamError::TeamNotFound { team_id })?;
        self.teams
            .find_team(&team_id)
            .await?
            .ok_or(TeamError::TeamNotFound { team_id })
    }
}
