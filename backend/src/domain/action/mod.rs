//! Action envelope pipeline.
//!
//! Every server action runs through [`ActionPipeline::wrap`]. The wrapped
//! callable resolves the caller's [`ActionContext`], runs the operation and
//! turns whatever happens into an [`ActionResult`]:
//!
//! - plain data becomes `{ "success": true, "data": ... }`;
//! - an [`ActionResult`] returned by the operation passes through untouched;
//! - [`ActionFault`]s map to their codes; internal faults and panics become a
//!   sanitised `INTERNAL_ERROR` carrying the request trace id.
//!
//! A wrapped action never panics and never returns `Err`.
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use backend::domain::action::{
//!     ActionContext, ActionFault, ActionOptions, ActionPipeline, ContextError,
//!     ContextResolver, SessionClaims,
//! };
//!
//! struct NoSessions;
//!
//! #[async_trait]
//! impl ContextResolver for NoSessions {
//!     async fn resolve(&self, _: &SessionClaims) -> Result<ActionContext, ContextError> {
//!         Err(ContextError::NoSession)
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let pipeline = ActionPipeline::new(Arc::new(NoSessions));
//! let double = pipeline.wrap(ActionOptions::named("double"), |_ctx, n: i32| async move {
//!     Ok::<_, ActionFault>(n * 2)
//! });
//! let result = double.call(&SessionClaims::anonymous(), 21).await;
//! assert_eq!(result.error().and_then(|e| e.code()), Some("UNAUTHENTICATED"));
//! # });
//! ```

mod context;
mod envelope;
mod fault;

use std::any::Any;
use std::borrow::Cow;
use std::future::Future;
use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::domain::TraceId;

pub use self::context::{ActionContext, ContextError, ContextResolver, SessionClaims};
pub use self::envelope::{ActionError, ActionResult, EnvelopeShapeError, IntoActionResult};
pub use crate::plain_action_data;
pub use self::fault::{ActionFault, BoxError, INTERNAL_ERROR_MESSAGE, code};

#[cfg(test)]
pub use self::context::MockContextResolver;

/// Per-action settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOptions {
    name: Cow<'static, str>,
}

impl ActionOptions {
    /// Options for an action called `name` in logs and spans.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// Action name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self::named("anonymous")
    }
}

/// Factory for wrapped actions sharing one context resolver.
#[derive(Clone)]
pub struct ActionPipeline {
    resolver: Arc<dyn ContextResolver>,
}

impl ActionPipeline {
    /// Pipeline whose actions resolve their context through `resolver`.
    pub fn new(resolver: Arc<dyn ContextResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve a context outside a wrapped action, e.g. straight after login.
    pub async fn resolve(&self, session: &SessionClaims) -> Result<ActionContext, ContextError> {
        self.resolver.resolve(session).await
    }

    /// Wrap `op` so every call resolves a context first and always yields an
    /// envelope.
    pub fn wrap<Op, A, Fut, R>(&self, options: ActionOptions, op: Op) -> WrappedAction<Op, A>
    where
        Op: Fn(ActionContext, A) -> Fut,
        Fut: Future<Output = Result<R, ActionFault>>,
        R: IntoActionResult,
    {
        WrappedAction {
            resolver: Arc::clone(&self.resolver),
            options,
            op,
            _args: PhantomData,
        }
    }
}

/// An operation bound to the pipeline. Holds only immutable state, so one
/// instance may serve any number of concurrent calls.
pub struct WrappedAction<Op, A> {
    resolver: Arc<dyn ContextResolver>,
    options: ActionOptions,
    op: Op,
    _args: PhantomData<fn(A)>,
}

impl<Op, A, Fut, R> WrappedAction<Op, A>
where
    Op: Fn(ActionContext, A) -> Fut,
    Fut: Future<Output = Result<R, ActionFault>>,
    R: IntoActionResult,
{
    /// Run the action for `session` with `args`.
    pub async fn call(&self, session: &SessionClaims, args: A) -> ActionResult<R::Data> {
        let trace_id = TraceId::current().map(|id| id.to_string());
        let span = info_span!(
            "action",
            action = %self.options.name(),
            trace_id = trace_id.as_deref().unwrap_or_default(),
        );
        self.run(session, args).instrument(span).await
    }

    async fn run(&self, session: &SessionClaims, args: A) -> ActionResult<R::Data> {
        let resolved = AssertUnwindSafe(async { self.resolver.resolve(session).await })
            .catch_unwind()
            .await;
        let context = match resolved {
            Ok(Ok(context)) => context,
            Ok(Err(err)) => return context_failure(err),
            Err(panic) => {
                error!(panic = %panic_message(panic.as_ref()), "context resolver panicked");
                return ActionResult::failure(internal_error());
            }
        };
        settle(&self.options, async move { (self.op)(context, args).await }).await
    }
}

/// Fault boundary shared by wrapped actions and the pre-context login flow.
///
/// Awaits `operation`, catching faults and panics, and converts the outcome
/// into an envelope.
pub async fn settle<Fut, R>(options: &ActionOptions, operation: Fut) -> ActionResult<R::Data>
where
    Fut: Future<Output = Result<R, ActionFault>>,
    R: IntoActionResult,
{
    match AssertUnwindSafe(operation).catch_unwind().await {
        Ok(Ok(value)) => {
            let result = value.into_action_result();
            debug!(action = %options.name(), success = result.is_success(), "action settled");
            result
        }
        Ok(Err(fault)) => ActionResult::failure(fault_to_error(options, fault)),
        Err(panic) => {
            error!(
                action = %options.name(),
                panic = %panic_message(panic.as_ref()),
                "action panicked"
            );
            ActionResult::failure(internal_error())
        }
    }
}

fn fault_to_error(options: &ActionOptions, fault: ActionFault) -> ActionError {
    match fault {
        ActionFault::Validation { message, details } => {
            info!(action = %options.name(), %message, "action arguments rejected");
            with_optional_details(
                ActionError::new(message).with_code(code::VALIDATION_ERROR),
                details,
            )
        }
        ActionFault::Rejected {
            message,
            code,
            details,
        } => {
            let code = code.unwrap_or_else(|| code::OPERATION_FAILED.to_owned());
            info!(action = %options.name(), %code, %message, "action rejected");
            with_optional_details(ActionError::new(message).with_code(code), details)
        }
        ActionFault::Internal { source } => {
            error!(action = %options.name(), error = %source, "action failed");
            internal_error()
        }
    }
}

fn with_optional_details(
    error: ActionError,
    details: Option<serde_json::Map<String, serde_json::Value>>,
) -> ActionError {
    match details {
        Some(details) => error.with_details(details),
        None => error,
    }
}

fn context_failure<T>(err: ContextError) -> ActionResult<T> {
    if err.is_unauthenticated() {
        warn!(reason = %err, "action refused without a context");
        ActionResult::failure(
            ActionError::new("Authentication required").with_code(code::UNAUTHENTICATED),
        )
    } else {
        error!(error = %err, "context resolution failed");
        ActionResult::failure(internal_error())
    }
}

fn internal_error() -> ActionError {
    let error = ActionError::new(INTERNAL_ERROR_MESSAGE).with_code(code::INTERNAL_ERROR);
    match TraceId::current() {
        Some(trace_id) => error.with_detail("traceId", trace_id.to_string()),
        None => error,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
