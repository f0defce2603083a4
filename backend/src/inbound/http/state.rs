//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data`. It holds the action
//! pipeline and the domain services, all built from port trait objects so the
//! adapter stays testable without I/O.

use std::sync::Arc;

use crate::domain::action::ActionPipeline;
use crate::domain::ports::{
    CatalogRepository, LoginService, NotificationRepository, TeamRepository, UserRepository,
};
use crate::domain::{
    CatalogService, MembershipContextResolver, NotificationService, TeamService,
};

/// Parameter object bundling the port implementations behind the handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub pipeline: ActionPipeline,
    pub login: Arc<dyn LoginService>,
    pub catalog: CatalogService,
    pub teams: TeamService,
    pub notifications: NotificationService,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Wire the pipeline and services from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::PasswordLoginService;
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use backend::outbound::memory::InMemoryStores;
    ///
    /// let stores = InMemoryStores::new();
    /// let login = PasswordLoginService::new(stores.users.clone()).expect("login service");
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(login),
    ///     users: stores.users.clone(),
    ///     teams: stores.teams.clone(),
    ///     catalog: stores.catalog.clone(),
    ///     notifications: stores.notifications.clone(),
    /// });
    /// let _pipeline = state.pipeline.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            users,
            teams,
            catalog,
            notifications,
        } = ports;
        let resolver = MembershipContextResolver::new(Arc::clone(&users), Arc::clone(&teams));
        let notifications = NotificationService::new(notifications, Arc::clone(&teams));
        Self {
            pipeline: ActionPipeline::new(Arc::new(resolver)),
            login,
            catalog: CatalogService::new(catalog, notifications.clone()),
            teams: TeamService::new(teams, users),
            notifications,
        }
    }
}
