//! Teams (tenants) and user membership.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Permission, UserId};

/// Errors raised when parsing team values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TeamValidationError {
    #[error("team id must be a valid UUID")]
    InvalidId,
    #[error("team name must not be empty")]
    EmptyName,
}

/// Stable team identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, format = Uuid)]
pub struct TeamId(Uuid);

impl TeamId {
    /// Parse a [`TeamId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, TeamValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| TeamValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TeamId> for String {
    fn from(value: TeamId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for TeamId {
    type Error = TeamValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A tenant owning catalogs and notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    id: TeamId,
    name: String,
}

impl Team {
    /// Build a team; the name is trimmed and must not be blank.
    pub fn new(id: TeamId, name: impl AsRef<str>) -> Result<Self, TeamValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(TeamValidationError::EmptyName);
        }
        Ok(Self {
            id,
            name: name.to_owned(),
        })
    }

    /// Team identifier.
    pub fn id(&self) -> TeamId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Role a user holds within a team.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Estimator,
    Viewer,
}

impl Role {
    /// Every role, highest privilege first.
    pub const ALL: [Self; 4] = [Self::Owner, Self::Admin, Self::Estimator, Self::Viewer];
}

/// A user's membership in a team, with per-member permission adjustments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub user_id: UserId,
    pub team_id: TeamId,
    pub role: Role,
    /// Permissions granted on top of the role defaults.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub granted: BTreeSet<Permission>,
    /// Permissions withheld from the role defaults. Wins over `granted`.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub revoked: BTreeSet<Permission>,
}

impl Membership {
    /// Membership with role defaults only.
    #[must_use]
    pub fn new(user_id: UserId, team_id: TeamId, role: Role) -> Self {
        Self {
            user_id,
            team_id,
            role,
            granted: BTreeSet::new(),
            revoked: BTreeSet::new(),
        }
    }

    /// Add an explicit grant.
    #[must_use]
    pub fn with_grant(mut self, permission: Permission) -> Self {
        self.granted.insert(permission);
        self
    }

    /// Add an explicit revocation.
    #[must_use]
    pub fn with_revocation(mut self, permission: Permission) -> Self {
        self.revoked.insert(permission);
        self
    }
}
