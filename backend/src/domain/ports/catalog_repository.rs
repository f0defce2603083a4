//! Port for works and materials catalog storage.
//!
//! Items are always scoped by team and kind; adapters never return an item
//! belonging to another team.
use async_trait::async_trait;

use crate::domain::{CatalogItem, CatalogItemId, CatalogKind, TeamId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalog repository adapters.
    pub enum CatalogPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalog repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalog repository query failed: {message}",
    }
}

/// Outcome of a name-guarded catalog write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogWrite {
    /// The item was stored.
    Stored,
    /// Another item of the same team and kind already uses the name,
    /// compared ignoring case. Nothing was written.
    NameTaken,
    /// The item to replace no longer exists. Nothing was written.
    Missing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All items of `kind` owned by `team_id`, in insertion order.
    async fn list(
        &self,
        team_id: &TeamId,
        kind: CatalogKind,
    ) -> Result<Vec<CatalogItem>, CatalogPersistenceError>;

    /// Item of `kind` with `id`, if the team owns one.
    async fn find(
        &self,
        team_id: &TeamId,
        kind: CatalogKind,
        id: &CatalogItemId,
    ) -> Result<Option<CatalogItem>, CatalogPersistenceError>;

    /// Insert a new item unless its name clashes with another item of the
    /// same team and kind. The check and the insert are one atomic step.
    ///
    /// Never reports [`CatalogWrite::Missing`].
    async fn insert_unique(
        &self,
        item: &CatalogItem,
    ) -> Result<CatalogWrite, CatalogPersistenceError>;

    /// Replace the stored item with the same id, atomically refusing a name
    /// that another item of the same team and kind already uses.
    async fn replace_unique(
        &self,
        item: &CatalogItem,
    ) -> Result<CatalogWrite, CatalogPersistenceError>;

    /// Remove an item, returning whether it existed.
    async fn delete(
        &self,
        team_id: &TeamId,
        kind: CatalogKind,
        id: &CatalogItemId,
    ) -> Result<bool, CatalogPersistenceError>;
}
