//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities and the use-cases behind every
//! server action. Types validate on construction and document their
//! serialisation contracts in their Rustdoc.
//!
//! Public surface:
//! - [`action`]: the action envelope pipeline (`ActionPipeline`,
//!   `ActionResult`, `ActionFault`, `ActionContext`).
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - User, Team, Membership, Permission: identity and access.
//! - CatalogService, NotificationService, TeamService: team-scoped use-cases.
//! - ports: driven and driving port traits implemented by adapters.

pub mod action;
pub mod auth;
pub mod catalog;
pub mod catalog_service;
pub mod context_resolver;
pub mod error;
pub mod login;
pub mod notification;
pub mod notification_service;
pub mod password;
pub mod permissions;
pub mod ports;
pub mod team;
pub mod team_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::catalog::{
    CATALOG_DESCRIPTION_MAX, CATALOG_NAME_MAX, CATALOG_UNIT_MAX, CatalogItem, CatalogItemDraft,
    CatalogItemId, CatalogKind, CatalogValidationError,
};
pub use self::catalog_service::{CatalogError, CatalogService};
pub use self::context_resolver::MembershipContextResolver;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::login::PasswordLoginService;
pub use self::notification::{Notification, NotificationId};
pub use self::notification_service::NotificationService;
pub use self::password::{PasswordError, PasswordHash, hash_password, verify_password};
pub use self::permissions::{
    Permission, PermissionMatrix, PermissionMatrixRow, PermissionSet, get_user_permissions,
    role_permissions,
};
pub use self::team::{Membership, Role, Team, TeamId, TeamValidationError};
pub use self::team_service::{TeamError, TeamMember, TeamService, UserProfile};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DISPLAY_NAME_MAX, DISPLAY_NAME_MIN, DisplayName, Email, User, UserId, UserValidationError,
};
