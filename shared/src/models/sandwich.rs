//! Sandwich Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sandwich entity — the aggregation root for rating statistics
///
/// `average_rating` and `review_count` are maintained incrementally by the
/// review transaction, never recalculated from scratch. `ingredients` is a
/// monotonically growing union of every review's ingredient list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sandwich {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Owning restaurant reference (String ID, not enforced by the store)
    pub restaurant_id: String,
    pub average_rating: f64,
    pub review_count: i64,
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Primary photo; promoted from the first review photo if unset
    #[serde(default)]
    pub image_url: Option<String>,
    /// Append-only photo history
    #[serde(default)]
    pub all_photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Update sandwich payload (admin edit modal)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandwichUpdate {
    pub name: Option<String>,
    pub restaurant_id: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub image_url: Option<String>,
}
