//! Input validation schemas
//!
//! Field-level constraints for the submission wizard and profile form.
//! Validation fails fast before any side effect, and the resulting
//! [`AppError::Validation`] message enumerates every violated constraint
//! (joined by `", "`) — it is surfaced verbatim to the end user.

use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult};
use validator::{Validate, ValidationError, ValidationErrors};

/// Raw image attachment from the photo step
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Review submission input
///
/// `sandwich_id` / `restaurant_id` carry either an existing document id or
/// the `"new"` sentinel; the `new_*` fields are only meaningful alongside
/// the sentinel.
#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    #[validate(length(min = 1, message = "User ID is required"))]
    pub user_id: String,

    #[validate(length(min = 1, max = 100, message = "User name is required"))]
    pub user_name: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(max = 1000, message = "Comment is too long"))]
    pub comment: String,

    #[validate(length(min = 1, message = "Sandwich selection is required"))]
    pub sandwich_id: String,

    #[validate(length(min = 1, message = "Restaurant selection is required"))]
    pub restaurant_id: String,

    #[validate(length(max = 20, message = "Too many ingredients"))]
    pub ingredients: Vec<String>,

    #[validate(length(max = 100, message = "Restaurant name is too long"))]
    pub new_restaurant_name: Option<String>,

    #[validate(custom(function = validate_website))]
    pub new_restaurant_website: Option<String>,

    #[validate(length(max = 500, message = "Address is too long"))]
    pub new_restaurant_address: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub new_restaurant_lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub new_restaurant_lng: Option<f64>,

    #[validate(length(max = 100, message = "Sandwich name is too long"))]
    pub new_sandwich_name: Option<String>,

    #[serde(skip)]
    pub image_file: Option<ImageFile>,
}

/// Profile settings input
#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileInput {
    #[validate(length(min = 1, max = 100, message = "Display name is required"))]
    pub display_name: String,

    #[validate(length(max = 100, message = "Location is too long"))]
    pub location: Option<String>,

    #[validate(length(max = 500, message = "Bio is too long"))]
    pub bio: Option<String>,

    #[validate(custom(function = validate_website))]
    pub photo_url: Option<String>,
}

/// Absolute http(s) URL, or empty (meaning "none")
fn validate_website(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        let mut err = ValidationError::new("url");
        err.message = Some("Invalid website URL".into());
        Err(err)
    }
}

/// Flatten every violation into one comma-joined message.
///
/// Fields are ordered by name so the message is deterministic.
fn collect_messages(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| field.clone());

    let mut messages = Vec::new();
    for (field, errs) in fields {
        for err in errs.iter() {
            match &err.message {
                Some(msg) => messages.push(msg.to_string()),
                None => messages.push(format!("{field} is invalid")),
            }
        }
    }
    messages.join(", ")
}

/// Run derive-based validation and convert to the application error
pub fn validate_input(input: &impl Validate) -> AppResult<()> {
    input
        .validate()
        .map_err(|e| AppError::validation(collect_messages(&e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ReviewInput {
        ReviewInput {
            user_id: "u1".to_string(),
            user_name: "Sam".to_string(),
            rating: 4,
            comment: "Great bite".to_string(),
            sandwich_id: "s1".to_string(),
            restaurant_id: "r1".to_string(),
            ingredients: vec!["bacon".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate_input(&valid_input()).is_ok());
    }

    #[test]
    fn test_all_violations_reported_together() {
        let input = ReviewInput {
            rating: 10,
            user_id: String::new(),
            ..valid_input()
        };
        let err = validate_input(&input).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Rating must be between 1 and 5"), "{msg}");
        assert!(msg.contains("User ID is required"), "{msg}");
    }

    #[test]
    fn test_comment_length_cap() {
        let input = ReviewInput {
            comment: "x".repeat(1001),
            ..valid_input()
        };
        let err = validate_input(&input).unwrap_err();
        assert!(err.to_string().contains("Comment is too long"));
        // Exactly at the cap is fine
        let input = ReviewInput {
            comment: "x".repeat(1000),
            ..valid_input()
        };
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn test_ingredient_cap() {
        let input = ReviewInput {
            ingredients: (0..21).map(|i| format!("i{i}")).collect(),
            ..valid_input()
        };
        let err = validate_input(&input).unwrap_err();
        assert!(err.to_string().contains("Too many ingredients"));
    }

    #[test]
    fn test_website_url_or_empty() {
        let ok_empty = ReviewInput {
            new_restaurant_website: Some(String::new()),
            ..valid_input()
        };
        assert!(validate_input(&ok_empty).is_ok());

        let ok_https = ReviewInput {
            new_restaurant_website: Some("https://lous.example".to_string()),
            ..valid_input()
        };
        assert!(validate_input(&ok_https).is_ok());

        let bad = ReviewInput {
            new_restaurant_website: Some("not a url".to_string()),
            ..valid_input()
        };
        let err = validate_input(&bad).unwrap_err();
        assert!(err.to_string().contains("Invalid website URL"));
    }
}
