use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{RoleChange, TeamPersistenceError, TeamRepository};
use crate::domain::{Membership, Role, Team, TeamId, UserId};

#[derive(Debug, Default)]
struct TeamState {
    teams: HashMap<TeamId, Team>,
    /// Insertion ordered, so "oldest first" is iteration order.
    memberships: Vec<Membership>,
}

/// Teams and memberships.
#[derive(Debug, Default)]
pub struct InMemoryTeamRepository {
    state: RwLock<TeamState>,
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn upsert_team(&self, team: &Team) -> Result<(), TeamPersistenceError> {
        self.state
            .write()
            .await
            .teams
            .insert(team.id(), team.clone());
        Ok(())
    }

    async fn find_team(&self, id: &TeamId) -> Result<Option<Team>, TeamPersistenceError> {
        Ok(self.state.read().await.teams.get(id).cloned())
    }

    async fn save_membership(&self, membership: &Membership) -> Result<(), TeamPersistenceError> {
        let mut state = self.state.write().await;
        if !state.teams.contains_key(&membership.team_id) {
            return Err(TeamPersistenceError::query(format!(
                "team {} does not exist",
                membership.team_id
            )));
        }
        match state.memberships.iter_mut().find(|existing| {
            existing.team_id == membership.team_id && existing.user_id == membership.user_id
        }) {
            Some(existing) => *existing = membership.clone(),
            None => state.memberships.push(membership.clone()),
        }
        Ok(())
    }

    async fn find_membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<Option<Membership>, TeamPersistenceError> {
        Ok(self
            .state
            .read()
            .await
            .memberships
            .iter()
            .find(|m| m.team_id == *team_id && m.user_id == *user_id)
            .cloned())
    }

    async fn memberships_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Membership>, TeamPersistenceError> {
        Ok(self
            .state
            .read()
            .await
            .memberships
            .iter()
            .filter(|m| m.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn members(&self, team_id: &TeamId) -> Result<Vec<Membership>, TeamPersistenceError> {
        Ok(self
            .state
            .read()
            .await
            .memberships
            .iter()
            .filter(|m| m.team_id == *team_id)
            .cloned()
            .collect())
    }

    async fn change_role(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
        from: Role,
        to: Role,
    ) -> Result<RoleChange, TeamPersistenceError> {
        let mut state = self.state.write().await;
        let owners = state
            .memberships
            .iter()
            .filter(|m| m.team_id == *team_id && m.role == Role::Owner)
            .count();
        let Some(membership) = state
            .memberships
            .iter_mut()
            .find(|m| m.team_id == *team_id && m.user_id == *user_id)
        else {
            return Ok(RoleChange::NotAMember);
        };
        if membership.role != from {
            return Ok(RoleChange::Stale {
                current: membership.role,
            });
        }
        if from == Role::Owner && to != Role::Owner && owners <= 1 {
            return Ok(RoleChange::LastOwner);
        }
        membership.role = to;
        Ok(RoleChange::Changed(membership.clone()))
    }
}
