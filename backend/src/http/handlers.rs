//! HTTP handlers for the REST API.
//!
//! [`contributions`] is the dispatcher for the contribution route. One
//! request goes through these steps:
//!
//! 1. method check (only GET, anything else is 403)
//! 2. path parsing (400 on failure)
//! 3. handler resolution in the registry (404 when unknown)
//! 4. a single provider invocation, bounded by the provider deadline
//! 5. result interpretation: no data is 404, a result is formatted as a
//!    200 JSON response, a provider failure is 500
//!
//! No retries are attempted; a provider failure is terminal for the request.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::{
    extract::State,
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use futures::FutureExt;
use tracing::{debug, error, info_span, warn, Instrument};
use uuid::Uuid;

use super::dto::HealthResponse;
use super::error::DispatchError;
use super::path;
use super::response;
use super::state::AppState;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports the service version and the registered handler names.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        handlers: state.registry.names(),
    })
}

// =============================================================================
// Contributions
// =============================================================================

/// ANY /{prefix}/{handler}/{since}/{contributor...}
///
/// Errors are logged here with the request URI and converted to their
/// fixed client response.
pub async fn contributions(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let span = info_span!("dispatch", request_id = %Uuid::new_v4(), %method, %uri);

    async move {
        match dispatch(&state, &method, &uri).await {
            Ok(response) => response,
            Err(err) => {
                if err.status().is_server_error() {
                    error!(error = %err, "Request failed");
                } else {
                    warn!(error = %err, "Request rejected");
                }
                err.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

/// Run one request through the pipeline.
pub async fn dispatch(
    state: &AppState,
    method: &Method,
    uri: &Uri,
) -> Result<Response, DispatchError> {
    if *method != Method::GET {
        return Err(DispatchError::MethodNotAllowed(method.clone()));
    }

    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let parsed = path::parse(target, &state.prefix)?;

    let handler = &parsed.route.handler_name;
    let provider = state
        .registry
        .resolve(handler)
        .ok_or_else(|| DispatchError::UnknownHandler(handler.clone()))?;

    debug!(
        handler = %handler,
        kind = %provider.kind(),
        contributor = %parsed.query.contributor_id,
        since = %parsed.query.since,
        "Invoking provider"
    );

    let call = AssertUnwindSafe(provider.contributions(&parsed.query)).catch_unwind();
    let outcome = tokio::time::timeout(state.provider_timeout, call)
        .await
        .map_err(|_| DispatchError::Timeout(state.provider_timeout))?
        .map_err(|panic| DispatchError::Panic(panic_message(panic.as_ref())))?;

    let paged = outcome?
        .ok_or_else(|| DispatchError::UnknownContributor(parsed.query.contributor_id.clone()))?;

    debug!(
        count = paged.result.len(),
        prev = ?paged.prev,
        next = ?paged.next,
        "Provider returned contributions"
    );

    response::format(&paged, &state.base, uri.path())
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
