//! HTTP error handling and response types.
//!
//! Client-facing bodies are fixed short strings per status; the detail of
//! a failure is only ever logged.

use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};

use super::path::ParseFailure;
use crate::providers::ProviderError;

pub const BODY_INVALID_REQUEST: &str = "Invalid request";
pub const BODY_FORBIDDEN: &str = "Forbidden";
pub const BODY_UNKNOWN_CONTRIBUTOR: &str = "Unknown contributor identifier";
pub const BODY_OOPS: &str = "Oops";

/// Why a request did not produce contributions.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Only GET is accepted on the contribution route.
    #[error("method {0} is forbidden")]
    MethodNotAllowed(Method),

    #[error("failed to parse request URL: {0}")]
    Parse(#[from] ParseFailure),

    #[error("no handler registered under '{0}'")]
    UnknownHandler(String),

    #[error("no contributions known for '{0}'")]
    UnknownContributor(String),

    #[error("provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("provider did not answer within {0:?}")]
    Timeout(Duration),

    #[error("provider panicked: {0}")]
    Panic(String),

    #[error("failed to build response: {0}")]
    Response(String),
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::MethodNotAllowed(_) => StatusCode::FORBIDDEN,
            DispatchError::Parse(_) => StatusCode::BAD_REQUEST,
            DispatchError::Provider(ProviderError::InvalidQuery(_)) => StatusCode::BAD_REQUEST,
            DispatchError::UnknownHandler(_) | DispatchError::UnknownContributor(_) => {
                StatusCode::NOT_FOUND
            }
            DispatchError::Provider(_)
            | DispatchError::Timeout(_)
            | DispatchError::Panic(_)
            | DispatchError::Response(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The fixed body sent to the client for this error.
    pub fn client_message(&self) -> &'static str {
        match self.status() {
            StatusCode::BAD_REQUEST => BODY_INVALID_REQUEST,
            StatusCode::FORBIDDEN => BODY_FORBIDDEN,
            StatusCode::NOT_FOUND => BODY_UNKNOWN_CONTRIBUTOR,
            _ => BODY_OOPS,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.client_message(),
        )
            .into_response()
    }
}
