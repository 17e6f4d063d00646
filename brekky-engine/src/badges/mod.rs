//! Badge System
//!
//! - `catalog`: the compiled-in badge definitions
//! - `engine`: the pure eligibility engine
//! - `updater`: store orchestration + detached recompute task

pub mod catalog;
pub mod engine;
pub mod updater;

pub use catalog::{badge_by_slug, ALL_BADGES};
pub use engine::calculate_eligible_badges;
pub use updater::BadgeService;
