//! Domain types for Cyberfort Core.
//!
//! This module contains the check records and verdict value objects.

mod phone_check;
mod url_check;

pub use phone_check::*;
pub use url_check::*;
