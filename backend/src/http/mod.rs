//! HTTP server module.
//!
//! This module exposes the contribution pipeline over axum:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Router (router.rs)                                       │
//! │  - CORS, compression, request tracing                     │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Dispatcher (handlers.rs)                                 │
//! │  - method check, path parsing (path.rs)                   │
//! │  - registry resolution, provider invocation               │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Response formatter (response.rs)                         │
//! │  - pretty JSON body, pagination Link header               │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod path;
pub mod response;
pub mod router;
pub mod state;

pub use error::DispatchError;
pub use path::{parse, ParseFailure, ParsedPath};
pub use router::create_router;
pub use state::AppState;
