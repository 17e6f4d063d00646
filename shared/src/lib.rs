//! Shared types for the BrekkySammy directory
//!
//! Data models, error types and domain utility helpers used by the
//! engine crate and (via JSON) by the frontend.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult};
pub use serde::{Deserialize, Serialize};
