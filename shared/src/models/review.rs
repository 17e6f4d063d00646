//! Review Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review entity — one user's rating+comment+photo against one sandwich
///
/// Immutable once created except for moderator deletion. Reviews are the
/// source of truth for a sandwich's derived statistics and for all badge
/// computations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    /// Display-name snapshot, not a live reference
    pub user_name: String,
    /// 1-5 inclusive
    pub rating: i32,
    pub comment: String,
    pub sandwich_id: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
