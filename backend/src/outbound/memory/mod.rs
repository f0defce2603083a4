//! In-memory adapters for every driven port.
//!
//! State lives in `tokio::sync::RwLock`-guarded collections inside the
//! process, so data is lost on restart. [`InMemoryStores`] bundles one of
//! each adapter for wiring the server and tests.

mod catalog;
mod notifications;
mod seed;
mod teams;
mod users;

use std::sync::Arc;

pub use catalog::InMemoryCatalogRepository;
pub use notifications::InMemoryNotificationRepository;
pub use seed::{DemoAccounts, SeedError, seed_demo};
pub use teams::InMemoryTeamRepository;
pub use users::InMemoryUserRepository;

/// One instance of each in-memory adapter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStores {
    pub users: Arc<InMemoryUserRepository>,
    pub teams: Arc<InMemoryTeamRepository>,
    pub catalog: Arc<InMemoryCatalogRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
}

impl InMemoryStores {
    /// Empty stores.
    pub fn new() -> Self {
        Self::default()
    }
}
