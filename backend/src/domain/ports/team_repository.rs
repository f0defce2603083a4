//! Port for teams and their memberships.
use async_trait::async_trait;

use crate::domain::{Membership, Role, Team, TeamId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by team repository adapters.
    pub enum TeamPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "team repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "team repository query failed: {message}",
    }
}

/// Outcome of a guarded role change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleChange {
    /// The membership now carries the new role.
    Changed(Membership),
    /// The user does not belong to the team.
    NotAMember,
    /// The member's current role was not the expected one. Nothing was written.
    Stale { current: Role },
    /// The change would leave the team without an owner. Nothing was written.
    LastOwner,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Insert or rename a team.
    async fn upsert_team(&self, team: &Team) -> Result<(), TeamPersistenceError>;

    /// Team by id.
    async fn find_team(&self, id: &TeamId) -> Result<Option<Team>, TeamPersistenceError>;

    /// Insert or replace the membership for `(team_id, user_id)`.
    async fn save_membership(&self, membership: &Membership) -> Result<(), TeamPersistenceError>;

    /// Membership of `user_id` in `team_id`, if any.
    async fn find_membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<Option<Membership>, TeamPersistenceError>;

    /// Every membership held by `user_id`, oldest first.
    async fn memberships_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Membership>, TeamPersistenceError>;

    /// Every membership of `team_id`, oldest first.
    async fn members(&self, team_id: &TeamId) -> Result<Vec<Membership>, TeamPersistenceError>;

    /// Move `user_id` from role `from` to role `to` in one atomic step.
    ///
    /// Refuses with [`RoleChange::Stale`] when the stored role is no longer
    /// `from`, and with [`RoleChange::LastOwner`] when demoting the team's
    /// only owner.
    async fn change_role(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
        from: Role,
        to: Role,
    ) -> Result<RoleChange, TeamPersistenceError>;
}
