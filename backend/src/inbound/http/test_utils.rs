//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web};
use serde_json::json;

use crate::domain::PasswordLoginService;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{DemoAccounts, InMemoryStores, seed_demo};

pub const DEMO_PASSWORD: &str = "correct horse battery staple";
pub const OWNER_EMAIL: &str = "owner@acme.test";
pub const VIEWER_EMAIL: &str = "viewer@acme.test";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler state over freshly seeded in-memory stores.
pub async fn seeded_state() -> (web::Data<HttpState>, InMemoryStores, DemoAccounts) {
    let stores = InMemoryStores::new();
    let accounts = seed_demo(
        stores.users.as_ref(),
        stores.teams.as_ref(),
        stores.catalog.as_ref(),
        DEMO_PASSWORD,
    )
    .await
    .expect("seed demo data");
    let login = PasswordLoginService::new(stores.users.clone()).expect("login service");
    let state = HttpState::new(HttpStatePorts {
        login: Arc::new(login),
        users: stores.users.clone(),
        teams: stores.teams.clone(),
        catalog: stores.catalog.clone(),
        notifications: stores.notifications.clone(),
    });
    (web::Data::new(state), stores, accounts)
}

/// Log in through `/api/v1/login` and return the session cookie.
pub async fn login_cookie<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": DEMO_PASSWORD }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
