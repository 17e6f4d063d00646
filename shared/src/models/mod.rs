//! Data models
//!
//! Document shapes shared between the engine and the frontend (via JSON).
//! Stored documents use camelCase field names; ids are UUID strings except
//! ingredients, which are keyed by their normalized name.

pub mod badge;
pub mod ingredient;
pub mod restaurant;
pub mod review;
pub mod sandwich;
pub mod user_profile;

// Re-exports
pub use badge::*;
pub use ingredient::*;
pub use restaurant::*;
pub use review::*;
pub use sandwich::*;
pub use user_profile::*;
