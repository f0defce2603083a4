//! HTTP rendering of action envelopes.
//!
//! The body is always the envelope JSON; the status reflects the failure
//! code so proxies and clients without envelope awareness still see a
//! sensible status.

use actix_web::body::BoxBody;
use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Serialize;
use tracing::debug;

use crate::domain::action::{ActionError, ActionResult, code};

/// HTTP status for a failure `code`.
pub fn status_for_code(failure_code: Option<&str>) -> StatusCode {
    match failure_code {
        Some(code::UNAUTHENTICATED) => StatusCode::UNAUTHORIZED,
        Some(code::VALIDATION_ERROR) => StatusCode::BAD_REQUEST,
        Some(code::FORBIDDEN) => StatusCode::FORBIDDEN,
        Some(code::NOT_FOUND) => StatusCode::NOT_FOUND,
        Some(code::DUPLICATE_NAME | code::CONFLICT | code::LAST_OWNER) => StatusCode::CONFLICT,
        Some(code::INTERNAL_ERROR) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl<T: Serialize> Responder for ActionResult<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        let status = match &self {
            Self::Success { .. } => StatusCode::OK,
            Self::Failure { error, .. } => status_for_code(error.code()),
        };
        HttpResponse::build(status).json(&self)
    }
}

fn validation_failure(message: String) -> HttpResponse {
    debug!(%message, "request rejected before reaching an action");
    let envelope: ActionResult<()> =
        ActionResult::failure(ActionError::new(message).with_code(code::VALIDATION_ERROR));
    HttpResponse::BadRequest().json(envelope)
}

/// JSON body extractor settings that answer malformed bodies with a
/// `VALIDATION_ERROR` envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req| {
        let response = validation_failure(format!("Invalid request body: {err}"));
        InternalError::from_response(err, response).into()
    })
}

/// Path extractor settings that answer malformed segments with a
/// `VALIDATION_ERROR` envelope.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req| {
        let response = validation_failure(format!("Invalid path parameter: {err}"));
        InternalError::from_response(err, response).into()
    })
}

/// Query-string extractor settings mirroring [`json_config`].
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req| {
        let response = validation_failure(format!("Invalid query string: {err}"));
        InternalError::from_response(err, response).into()
    })
}
