//! Backend library modules.
//!
//! Actions run through [`domain::action::ActionPipeline`], which turns every
//! outcome into an action envelope. The HTTP adapter in [`inbound::http`]
//! renders those envelopes and [`outbound::memory`] backs the driven ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
