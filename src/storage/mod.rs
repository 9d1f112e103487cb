//! Storage layer for Cyberfort Core.
//!
//! Provides the check history via SQLx with SQLite.

mod models;
mod repository;

pub use repository::CheckRepository;
