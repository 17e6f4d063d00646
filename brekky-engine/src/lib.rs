//! BrekkySammy Engine - breakfast-sandwich directory core
//!
//! # Architecture overview
//!
//! Application-layer logic over an embedded transactional document store:
//!
//! - **Store** (`store`): versioned JSON document collections with atomic
//!   optimistic transactions and batched writes
//! - **Reviews** (`reviews`): the review submission transaction
//! - **Badges** (`badges`): pure eligibility engine + detached recompute
//! - **Admin** (`admin`): moderator cascading deletes
//!
//! # Module structure
//!
//! ```text
//! brekky-engine/src/
//! ├── config.rs      # env-driven configuration
//! ├── logger.rs      # tracing setup
//! ├── store/         # embedded document store
//! ├── blob.rs        # file-backed blob storage
//! ├── sanitize.rs    # markup/URL sanitization
//! ├── validation.rs  # input schemas
//! ├── reviews.rs     # review submission transaction
//! ├── badges/        # badge catalog, engine, updater
//! ├── users.rs       # profile fetch/update
//! └── admin.rs       # cascading moderation deletes
//! ```

pub mod admin;
pub mod badges;
pub mod blob;
pub mod config;
pub mod logger;
pub mod reviews;
pub mod sanitize;
pub mod store;
pub mod users;
pub mod validation;

// Re-export public types
pub use badges::{calculate_eligible_badges, BadgeService, ALL_BADGES};
pub use blob::BlobStore;
pub use config::Config;
pub use logger::init_logger;
pub use admin::AdminService;
pub use reviews::{ReviewRefs, ReviewService, NEW_SENTINEL};
pub use store::{DocumentStore, WriteBatch};
pub use users::UserService;
pub use validation::{ReviewInput, UserProfileInput};

// Re-export unified error types from shared
pub use shared::{AppError, AppResult};
