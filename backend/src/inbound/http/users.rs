//! Session and identity handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"owner@acme.test","password":"..."}
//! POST /api/v1/logout
//! GET /api/v1/me
//! POST /api/v1/session/team {"teamId":"..."}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::action::{ActionFault, ActionOptions, ActionResult, SessionClaims, settle};
use crate::domain::{LoginCredentials, LoginValidationError, Team, TeamId, UserProfile};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Body for `POST /api/v1/session/team`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwitchTeamRequest {
    pub team_id: TeamId,
}

fn login_validation_fault(err: LoginValidationError) -> ActionFault {
    let field = match err {
        LoginValidationError::EmptyEmail | LoginValidationError::InvalidEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    ActionFault::validation(err.to_string()).with_detail("field", field)
}

/// Authenticate and start a session.
///
/// Runs before any context exists, so it is not wrapped by the pipeline,
/// but faults still settle into the same envelope.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Envelope carrying the signed-in profile", body = UserProfile,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["session"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ActionResult<UserProfile> {
    let options = ActionOptions::named("login");
    settle(&options, async move {
        let credentials =
            LoginCredentials::try_from(payload.into_inner()).map_err(login_validation_fault)?;
        let user_id = state.login.authenticate(&credentials).await?;
        let context = state
            .pipeline
            .resolve(&SessionClaims::for_user(user_id))
            .await?;
        session.persist_login(user_id)?;
        session.select_team(context.team_id())?;
        Ok::<_, ActionFault>(UserProfile::from(&context))
    })
    .await
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["session"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ActionResult<()> {
    session.clear();
    ActionResult::success(())
}

/// The signed-in user with their active team, role and permissions.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Envelope carrying the profile", body = UserProfile),
        (status = 401, description = "No session")
    ),
    tags = ["session"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ActionResult<UserProfile> {
    state
        .pipeline
        .wrap(ActionOptions::named("me"), |ctx, (): ()| async move {
            Ok::<_, ActionFault>(UserProfile::from(&ctx))
        })
        .call(&session.claims(), ())
        .await
}

/// Make another team the active one.
#[utoipa::path(
    post,
    path = "/api/v1/session/team",
    request_body = SwitchTeamRequest,
    responses(
        (status = 200, description = "Envelope carrying the new active team", body = Team),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "No session"),
        (status = 404, description = "Not a member of that team")
    ),
    tags = ["session"],
    operation_id = "switchTeam"
)]
#[post("/session/team")]
pub async fn switch_team(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SwitchTeamRequest>,
) -> ActionResult<Team> {
    let teams = &state.teams;
    let selected = &session;
    state
        .pipeline
        .wrap(
            ActionOptions::named("switchTeam"),
            move |ctx, team_id: TeamId| async move {
                let team = teams
                    .switch_team(&ctx, team_id)
                    .await
                    .map_err(ActionFault::from)?;
                selected.select_team(team.id())?;
                Ok::<_, ActionFault>(team)
            },
        )
        .call(&session.claims(), payload.into_inner().team_id)
        .await
}

#[cfg(test)]
mod tests;
