//! Tests for session and identity handlers.

use super::*;
use crate::domain::action::code;
use crate::inbound::http::envelope::json_config;
use crate::inbound::http::test_utils::{
    DEMO_PASSWORD, OWNER_EMAIL, VIEWER_EMAIL, login_cookie, seeded_state, test_session_middleware,
};
use actix_web::http::StatusCode;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};

macro_rules! users_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state)
                .app_data(json_config())
                .wrap(test_session_middleware())
                .service(
                    web::scope("/api/v1")
                        .service(login)
                        .service(logout)
                        .service(current_user)
                        .service(switch_team),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn login_returns_profile_and_sets_cookie() {
    let (state, _, accounts) = seeded_state().await;
    let app = users_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": " Owner@Acme.test ", "password": DEMO_PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.response().cookies().any(|c| c.name() == "session"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["user"]["id"], json!(accounts.owner_id.to_string()));
    assert_eq!(body["data"]["team"]["id"], json!(accounts.team_id.to_string()));
    assert_eq!(body["data"]["role"], json!("owner"));
}

#[actix_web::test]
async fn wrong_password_is_unauthenticated() {
    let (state, _, _) = seeded_state().await;
    let app = users_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": OWNER_EMAIL, "password": "nope" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.response().cookies().all(|c| c.name() != "session"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!(code::UNAUTHENTICATED));
}

#[rstest]
#[case("   ", "password", "email")]
#[case("not-an-email", "password", "email")]
#[case(OWNER_EMAIL, "", "password")]
#[actix_web::test]
async fn invalid_login_payload_names_the_field(
    #[case] email: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let (state, _, _) = seeded_state().await;
    let app = users_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"]["code"], json!(code::VALIDATION_ERROR));
    assert_eq!(body["error"]["details"]["field"], json!(field));
}

#[actix_web::test]
async fn me_requires_a_session() {
    let (state, _, _) = seeded_state().await;
    let app = users_app!(state);

    let res = test::call_service(&app, test::TestRequest::get().uri("/api/v1/me").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": { "message": "Authentication required", "code": code::UNAUTHENTICATED }
        })
    );
}

#[actix_web::test]
async fn me_reports_viewer_permissions() {
    let (state, _, accounts) = seeded_state().await;
    let app = users_app!(state);
    let cookie = login_cookie(&app, VIEWER_EMAIL).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/me").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["user"]["id"], json!(accounts.viewer_id.to_string()));
    assert_eq!(body["data"]["role"], json!("viewer"));
    let permissions = body["data"]["permissions"]
        .as_array()
        .expect("permissions array");
    assert!(permissions.contains(&json!("works_read")));
    assert!(!permissions.contains(&json!("works_write")));
}

#[actix_web::test]
async fn logout_clears_the_session() {
    let (state, _, _) = seeded_state().await;
    let app = users_app!(state);
    let cookie = login_cookie(&app, OWNER_EMAIL).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let removal = res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("removal cookie")
        .into_owned();
    assert_eq!(removal.value(), "");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "success": true, "data": null }));
}

#[actix_web::test]
async fn switching_to_a_foreign_team_is_not_found() {
    let (state, _, _) = seeded_state().await;
    let app = users_app!(state);
    let cookie = login_cookie(&app, OWNER_EMAIL).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/session/team")
            .cookie(cookie)
            .set_json(json!({ "teamId": TeamId::random() }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"]["code"], json!(code::NOT_FOUND));
}

#[actix_web::test]
async fn switching_to_own_team_returns_it() {
    let (state, _, accounts) = seeded_state().await;
    let app = users_app!(state);
    let cookie = login_cookie(&app, OWNER_EMAIL).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/session/team")
            .cookie(cookie)
            .set_json(json!({ "teamId": accounts.team_id }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["name"], json!("Acme Builders"));
}
