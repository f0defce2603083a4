//! Permission resolution for team members.
//!
//! Effective permissions are a lookup: the role's default set, plus the
//! member's explicit grants, minus explicit revocations.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Membership, Role};

/// A single capability checked by domain services.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// List works.
    WorksRead,
    /// Create, edit and delete works.
    WorksWrite,
    /// List materials.
    MaterialsRead,
    /// Create, edit and delete materials.
    MaterialsWrite,
    /// See team members.
    TeamRead,
    /// Change member roles.
    TeamManage,
    /// Read one's own notifications.
    NotificationsRead,
}

impl Permission {
    /// Every permission, in matrix column order.
    pub const ALL: [Self; 7] = [
        Self::WorksRead,
        Self::WorksWrite,
        Self::MaterialsRead,
        Self::MaterialsWrite,
        Self::TeamRead,
        Self::TeamManage,
        Self::NotificationsRead,
    ];
}

/// Ordered set of permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Whether `permission` is present.
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// Iterate in stable order.
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    /// Number of permissions held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Default permissions attached to `role`.
pub fn role_permissions(role: Role) -> PermissionSet {
    match role {
        Role::Owner | Role::Admin => Permission::ALL.into_iter().collect(),
        Role::Estimator => [
            Permission::WorksRead,
            Permission::WorksWrite,
            Permission::MaterialsRead,
            Permission::MaterialsWrite,
            Permission::TeamRead,
            Permission::NotificationsRead,
        ]
        .into_iter()
        .collect(),
        Role::Viewer => [
            Permission::WorksRead,
            Permission::MaterialsRead,
            Permission::TeamRead,
            Permission::NotificationsRead,
        ]
        .into_iter()
        .collect(),
    }
}

/// Effective permissions for a team member.
///
/// # Examples
/// ```
/// use backend::domain::{
///     get_user_permissions, Membership, Permission, Role, TeamId, UserId,
/// };
///
/// let membership = Membership::new(UserId::random(), TeamId::random(), Role::Viewer)
///     .with_grant(Permission::WorksWrite)
///     .with_revocation(Permission::TeamRead);
/// let permissions = get_user_permissions(&membership);
/// assert!(permissions.contains(Permission::WorksWrite));
/// assert!(!permissions.contains(Permission::TeamRead));
/// ```
pub fn get_user_permissions(membership: &Membership) -> PermissionSet {
    role_permissions(membership.role)
        .iter()
        .chain(membership.granted.iter().copied())
        .filter(|permission| !membership.revoked.contains(permission))
        .collect()
}

/// One row of the role × permission matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionMatrixRow {
    pub role: Role,
    pub permissions: BTreeMap<Permission, bool>,
}

/// Role defaults laid out for the team permissions page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionMatrix {
    pub permissions: Vec<Permission>,
    pub rows: Vec<PermissionMatrixRow>,
}

impl PermissionMatrix {
    /// Matrix of the built-in role defaults.
    #[must_use]
    pub fn standard() -> Self {
        let rows = Role::ALL
            .into_iter()
            .map(|role| {
                let defaults = role_permissions(role);
                PermissionMatrixRow {
                    role,
                    permissions: Permission::ALL
                        .into_iter()
                        .map(|permission| (permission, defaults.contains(permission)))
                        .collect(),
                }
            })
            .collect();
        Self {
            permissions: Permission::ALL.to_vec(),
            rows,
        }
    }
}

crate::domain::action::plain_action_data!(PermissionMatrix, PermissionSet);
