//! Builder for the HTTP handler state.

use std::sync::Arc;

use actix_web::web;

use backend::domain::PasswordLoginService;
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::InMemoryStores;

/// Wire the handler state over `stores`.
///
/// # Errors
/// Returns [`std::io::Error`] when the login service cannot prepare its
/// password hashing.
pub(crate) fn build_http_state(stores: &InMemoryStores) -> std::io::Result<web::Data<HttpState>> {
    let login = PasswordLoginService::new(stores.users.clone())
        .map_err(|err| std::io::Error::other(format!("login service setup failed: {err}")))?;
    Ok(web::Data::new(HttpState::new(HttpStatePorts {
        login: Arc::new(login),
        users: stores.users.clone(),
        teams: stores.teams.clone(),
        catalog: stores.catalog.clone(),
        notifications: stores.notifications.clone(),
    })))
}
