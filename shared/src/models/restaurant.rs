//! Restaurant Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Restaurant entity
///
/// Created implicitly during review submission when the caller signals a
/// new restaurant, or edited through the admin modal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    /// Region label shown in listings (defaults to the configured region)
    pub location: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Update restaurant payload (admin edit modal)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}
