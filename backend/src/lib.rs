//! # authoridy
//!
//! Contributor contribution aggregation server.
//!
//! Given a contributor identifier and a since-date, the server asks a
//! pluggable backend provider for that contributor's external contributions
//! (publications, repositories, deposited records) and returns them as
//! normalized JSON, with `Link` headers when the provider pages its results.
//!
//! ## Architecture
//!
//! - [`api`]: data model (date filter, query, records, paged results)
//! - [`providers`]: the provider capability and its backend adapters
//! - [`registry`]: handler name → provider table, built once at startup
//! - [`config`]: server configuration from CLI and environment
//! - [`http`]: path parser, dispatcher, response formatter and router
//!
//! ## Route
//!
//! `GET /{prefix}/{handler}/{since}/{contributor...}[?page=N]`, where
//! `since` is `*` or `YYYYMMDD`.

pub mod api;
pub mod providers;
pub mod registry;

#[cfg(feature = "http-server")]
pub mod config;

#[cfg(feature = "http-server")]
pub mod http;
