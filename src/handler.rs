//! The application seam and the translate-call-translate cycle.
//!
//! [`handle_request`] is the one entry point the Lambda wiring needs: it
//! parses the raw payload, resolves the reply shape up front, builds the
//! invocation environment, calls the application exactly once and translates
//! whatever comes back. Application errors propagate untouched; the adapter
//! neither retries nor rewrites them.

use anyhow::Result;
use lambda_runtime::Context;
use lambda_runtime::tracing::{debug, info};
use serde_json::Value;

use crate::config::AdapterConfig;
use crate::environ::Environ;
use crate::models::{GatewayEvent, GatewayReply};
use crate::request::build_environ;
use crate::response::{AppResponse, ReplyShape, build_reply};

/// The synchronous application being adapted.
pub trait Application {
    /// Handles one request environment, returning the status, headers and
    /// body in one value.
    ///
    /// # Errors
    ///
    /// Any error is propagated to the invocation boundary unmodified.
    fn call(&self, environ: Environ) -> Result<AppResponse>;
}

impl<F> Application for F
where
    F: Fn(Environ) -> Result<AppResponse>,
{
    fn call(&self, environ: Environ) -> Result<AppResponse> {
        self(environ)
    }
}

/// Calls the application exactly once with the prepared environment.
///
/// # Errors
///
/// Whatever the application raises, untouched.
pub fn invoke<A: Application + ?Sized>(app: &A, environ: Environ) -> Result<AppResponse> {
    app.call(environ)
}

/// Runs one full translate-call-translate cycle.
///
/// Configuration is re-read from the process environment on every call.
///
/// # Errors
///
/// [`crate::models::AdapterError::MalformedEvent`] when the event is missing
/// required fields or fails to decode,
/// [`crate::models::AdapterError::UnknownStatusCode`] when a load-balancer
/// status description cannot be produced, and any application error
/// unmodified.
pub fn handle_request<A: Application + ?Sized>(
    app: &A,
    payload: &Value,
    context: &Context,
) -> Result<GatewayReply> {
    let event = GatewayEvent::from_value(payload)?;
    let config = AdapterConfig::from_env();
    let shape = ReplyShape::from_event(&event);

    debug!(
        method = %event.http_method,
        path = %event.path,
        multi_value = event.uses_multi_value_headers(),
        "translating gateway event"
    );

    let environ = build_environ(&event, payload.clone(), context.clone(), &config)?;
    let response = invoke(app, environ)?;
    let reply = build_reply(&response, shape)?;

    info!(status = reply.status_code, "gateway reply ready");
    Ok(reply)
}
