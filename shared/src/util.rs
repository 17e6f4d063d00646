//! Domain utility helpers
//!
//! Ingredient normalization and rating display helpers used by the review
//! transaction, the badge engine and the frontend.

/// Normalize an ingredient string: lowercase + trim.
pub fn clean_ingredient(ingredient: &str) -> String {
    ingredient.to_lowercase().trim().to_string()
}

/// Merge new ingredients into an existing list.
///
/// Added entries are cleaned first; empty strings are dropped. The result is
/// an order-preserving union (existing entries keep their positions, new
/// entries append in input order). Merging a list with itself is a no-op.
pub fn merge_ingredients(existing: &[String], added: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = existing.to_vec();
    for ingredient in added {
        let cleaned = clean_ingredient(ingredient);
        if cleaned.is_empty() {
            continue;
        }
        if !merged.contains(&cleaned) {
            merged.push(cleaned);
        }
    }
    merged
}

/// Human-readable label for a star rating.
///
/// Out-of-range values (including 0) fall through to the picker prompt.
pub fn get_rating_label(rating: i32) -> &'static str {
    match rating {
        5 => "Legendary",
        4 => "Great",
        3 => "Solid",
        2 => "Meh",
        1 => "Never Again",
        _ => "Pick a star",
    }
}
