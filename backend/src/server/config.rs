//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use backend::outbound::memory::InMemoryStores;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) stores: InMemoryStores,
}

impl ServerConfig {
    /// Configuration over empty in-memory stores.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            stores: InMemoryStores::new(),
        }
    }

    /// Serve from `stores`, e.g. after seeding them.
    #[must_use]
    pub fn with_stores(mut self, stores: InMemoryStores) -> Self {
        self.stores = stores;
        self
    }
}
