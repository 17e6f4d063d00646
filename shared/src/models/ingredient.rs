//! Ingredient Model

use serde::{Deserialize, Serialize};

/// Global ingredient vocabulary entry
///
/// Keyed by its normalized lowercase name and used only as an autocomplete
/// pool. Upserted with merge semantics whenever a review introduces a new
/// ingredient string; pruning it never touches historical review/sandwich
/// data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
}
