//! HTTP API layer for Cyberfort Core.
//!
//! Provides REST endpoints for URL and phone checks and their history.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
