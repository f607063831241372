//! # Tasktrack API Server library
//!
//! Router, configuration and handlers for the Tasktrack HTTP API. The
//! binary entrypoint lives in `main.rs`; everything else is exported here
//! so the integration tests can drive the full router in-process.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
