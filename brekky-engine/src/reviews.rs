//! Review Submission
//!
//! The one write path that mutates rating data: validates the wizard input,
//! uploads the photo (outside the atomic region), then commits restaurant
//! resolution, sandwich statistics, the review document and the ingredient
//! vocabulary in a single store transaction. Post-commit it kicks off the
//! detached badge recompute.

use crate::badges::BadgeService;
use crate::blob::BlobStore;
use crate::config::Config;
use crate::sanitize::{sanitize_text, sanitize_url};
use crate::store::{DocumentStore, Transaction};
use crate::validation::{validate_input, ImageFile, ReviewInput};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use shared::models::{Ingredient, Restaurant, Review, Sandwich};
use shared::util::{clean_ingredient, merge_ingredients};
use shared::AppResult;
use std::sync::Arc;

/// Sentinel id meaning "create this entity as part of the submission"
pub const NEW_SENTINEL: &str = "new";

/// Collection names
const RESTAURANTS: &str = "restaurants";
const SANDWICHES: &str = "sandwiches";
const REVIEWS: &str = "reviews";
const INGREDIENTS: &str = "ingredients";

/// Ids resolved by a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRefs {
    pub restaurant_id: String,
    pub sandwich_id: String,
}

/// Review submission service
pub struct ReviewService {
    store: Arc<DocumentStore>,
    blobs: Arc<BlobStore>,
    badges: Arc<BadgeService>,
    config: Config,
}

impl ReviewService {
    pub fn new(store: Arc<DocumentStore>, blobs: Arc<BlobStore>, config: Config) -> Self {
        let badges = Arc::new(BadgeService::new(store.clone()));
        Self { store, blobs, badges, config }
    }

    /// Build a service from configuration: a fresh store with the configured
    /// retry cap, blobs rooted at the configured upload directory.
    pub fn from_config(config: Config) -> Self {
        let store = Arc::new(DocumentStore::with_retries(config.tx_max_retries));
        let blobs = Arc::new(BlobStore::new(config.upload_dir.clone()));
        Self::new(store, blobs, config)
    }

    /// Store handle (shared with sibling services)
    pub fn store(&self) -> Arc<DocumentStore> {
        self.store.clone()
    }

    /// Badge service handle (retroactive recompute drivers)
    pub fn badges(&self) -> Arc<BadgeService> {
        self.badges.clone()
    }

    /// Upload a review photo and return its public URL
    pub async fn upload_review_image(&self, file: &ImageFile, user_id: &str) -> AppResult<String> {
        let timestamp = Utc::now().timestamp_millis();
        let path = format!("reviews/{user_id}/{timestamp}_{}", file.file_name);
        self.blobs.upload(&path, &file.bytes).await
    }

    /// Validate and persist a new rating.
    ///
    /// Fails fast on validation with a message enumerating every violated
    /// constraint and zero writes performed. The image upload happens before
    /// the transaction and is not rolled back if the commit fails — an
    /// accepted inconsistency window. Everything else is atomic: restaurant
    /// resolution, sandwich statistics, the review document and the
    /// vocabulary upsert all commit or none do.
    pub async fn create_review(&self, input: ReviewInput) -> AppResult<ReviewRefs> {
        validate_input(&input)?;

        let image_url = match &input.image_file {
            Some(file) => self.upload_review_image(file, &input.user_id).await?,
            None => String::new(),
        };

        let created_at = Utc::now();
        let result = self
            .store
            .run_transaction(|tx| {
                let restaurant_id = self.resolve_restaurant(tx, &input, created_at)?;
                let sandwich_id =
                    self.resolve_sandwich(tx, &restaurant_id, &input, &image_url, created_at)?;

                let review = Review {
                    id: None,
                    user_id: input.user_id.clone(),
                    user_name: sanitize_text(&input.user_name),
                    rating: input.rating,
                    comment: sanitize_text(&input.comment),
                    sandwich_id: sandwich_id.clone(),
                    ingredients: normalize_ingredients(&input.ingredients),
                    image_url: optional_url(&image_url),
                    created_at,
                };
                tx.insert(REVIEWS, &review)?;

                upsert_global_ingredients(tx, &input.ingredients)?;

                Ok(ReviewRefs { restaurant_id, sandwich_id })
            })
            .await;

        let refs = match result {
            Ok(refs) => refs,
            Err(e) => {
                tracing::error!(error = %e, "review transaction failed");
                return Err(e);
            }
        };

        // Instant one-time achievements from this submission
        let mut achievements = Vec::new();
        if input.restaurant_id == NEW_SENTINEL {
            achievements.push("first_restaurant".to_string());
        }
        if input.sandwich_id == NEW_SENTINEL {
            achievements.push("first_sandwich".to_string());
        }
        self.badges.spawn_recompute(input.user_id.clone(), achievements);

        Ok(refs)
    }

    /// Restaurant resolution: insert under the `"new"` sentinel, pass the id
    /// through otherwise. Existence of a passed-through id is not verified.
    fn resolve_restaurant(
        &self,
        tx: &mut Transaction<'_>,
        input: &ReviewInput,
        created_at: DateTime<Utc>,
    ) -> AppResult<String> {
        let name = input.new_restaurant_name.as_deref().unwrap_or("");
        if input.restaurant_id != NEW_SENTINEL || name.is_empty() {
            return Ok(input.restaurant_id.clone());
        }

        let restaurant = Restaurant {
            id: None,
            name: sanitize_text(name),
            website: input
                .new_restaurant_website
                .as_deref()
                .filter(|w| !w.is_empty())
                .map(sanitize_url),
            location: self.config.default_location.clone(),
            address: input
                .new_restaurant_address
                .as_deref()
                .filter(|a| !a.is_empty())
                .map(sanitize_text),
            lat: input.new_restaurant_lat,
            lng: input.new_restaurant_lng,
            created_at,
            updated_at: None,
        };
        tx.insert(RESTAURANTS, &restaurant)
    }

    /// Sandwich resolution: seed a new document, or fold this rating into
    /// the existing one read inside the transaction.
    fn resolve_sandwich(
        &self,
        tx: &mut Transaction<'_>,
        restaurant_id: &str,
        input: &ReviewInput,
        image_url: &str,
        created_at: DateTime<Utc>,
    ) -> AppResult<String> {
        let name = input.new_sandwich_name.as_deref().unwrap_or("");
        if input.sandwich_id == NEW_SENTINEL && !name.is_empty() {
            let sandwich = Sandwich {
                id: None,
                name: sanitize_text(name),
                restaurant_id: restaurant_id.to_string(),
                average_rating: input.rating as f64,
                review_count: 1,
                ingredients: normalize_ingredients(&input.ingredients),
                image_url: optional_url(image_url),
                all_photos: if image_url.is_empty() {
                    Vec::new()
                } else {
                    vec![image_url.to_string()]
                },
                created_at,
                updated_at: None,
            };
            return tx.insert(SANDWICHES, &sandwich);
        }

        apply_existing_sandwich_review(tx, &input.sandwich_id, input, image_url)?;
        Ok(input.sandwich_id.clone())
    }
}

/// Fold a rating into an existing sandwich document.
///
/// The read happens inside the transaction; under concurrent submissions the
/// commit-time version check serializes the increments, so the incremental
/// average stays exact. If the referenced sandwich does not exist the update
/// is skipped and the review is still created against the dangling id —
/// preserved legacy behavior, isolated here so it can be tightened into a
/// hard failure without touching anything else.
fn apply_existing_sandwich_review(
    tx: &mut Transaction<'_>,
    sandwich_id: &str,
    input: &ReviewInput,
    image_url: &str,
) -> AppResult<()> {
    let Some(sandwich) = tx.get_as::<Sandwich>(SANDWICHES, sandwich_id)? else {
        tracing::warn!(sandwich_id, "review references missing sandwich, stats update skipped");
        return Ok(());
    };

    let new_count = sandwich.review_count + 1;
    let new_avg = (sandwich.average_rating * sandwich.review_count as f64
        + input.rating as f64)
        / new_count as f64;

    let mut updates = serde_json::Map::new();
    updates.insert("reviewCount".to_string(), json!(new_count));
    updates.insert("averageRating".to_string(), json!(new_avg));

    if !image_url.is_empty() {
        let mut photos = sandwich.all_photos.clone();
        photos.push(image_url.to_string());
        updates.insert("allPhotos".to_string(), json!(photos));
        // Promote to primary only when none was ever set
        if sandwich.image_url.is_none() {
            updates.insert("imageUrl".to_string(), json!(image_url));
        }
    }

    let sanitized: Vec<String> = input.ingredients.iter().map(|i| sanitize_text(i)).collect();
    updates.insert(
        "ingredients".to_string(),
        json!(merge_ingredients(&sandwich.ingredients, &sanitized)),
    );

    tx.update(SANDWICHES, sandwich_id, &Value::Object(updates))
}

/// Upsert every submitted ingredient into the global vocabulary, keyed by
/// its normalized name. Merge semantics keep the write idempotent and safe
/// under concurrent submissions racing on the same key.
fn upsert_global_ingredients(tx: &mut Transaction<'_>, ingredients: &[String]) -> AppResult<()> {
    for ingredient in ingredients {
        let sanitized = sanitize_text(&clean_ingredient(ingredient));
        if sanitized.is_empty() {
            continue;
        }
        tx.set_merge(INGREDIENTS, &sanitized, &Ingredient { name: sanitized.clone() })?;
    }
    Ok(())
}

/// Cleaned, sanitized, deduplicated ingredient list (empties dropped)
fn normalize_ingredients(ingredients: &[String]) -> Vec<String> {
    let sanitized: Vec<String> = ingredients.iter().map(|i| sanitize_text(i)).collect();
    merge_ingredients(&[], &sanitized)
}

fn optional_url(url: &str) -> Option<String> {
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

/// List the global ingredient vocabulary (autocomplete pool)
pub async fn global_ingredients(store: &DocumentStore) -> AppResult<Vec<String>> {
    let mut names: Vec<String> = store
        .list(INGREDIENTS)
        .await?
        .into_iter()
        .filter_map(|doc| doc.get("name").and_then(Value::as_str).map(str::to_string))
        .collect();
    names.sort_unstable();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ReviewInput;

    fn make_service() -> (ReviewService, Arc<DocumentStore>, tempfile::TempDir) {
        let store = Arc::new(DocumentStore::new());
        let dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(BlobStore::new(dir.path()));
        let service = ReviewService::new(store.clone(), blobs, Config::default());
        (service, store, dir)
    }

    fn base_input() -> ReviewInput {
        ReviewInput {
            user_id: "u1".to_string(),
            user_name: "Sam".to_string(),
            rating: 5,
            comment: "Best bite in town".to_string(),
            sandwich_id: "s1".to_string(),
            restaurant_id: "r1".to_string(),
            ingredients: vec!["Bacon".to_string(), "cheddar".to_string()],
            ..Default::default()
        }
    }

    async fn seed_sandwich(store: &DocumentStore, id: &str, avg: f64, count: i64) {
        store
            .set(
                SANDWICHES,
                id,
                &json!({
                    "name": "BEC",
                    "restaurantId": "r1",
                    "averageRating": avg,
                    "reviewCount": count,
                    "ingredients": ["bacon"],
                    "allPhotos": [],
                    "createdAt": Utc::now(),
                }),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_incremental_average_and_count() {
        let (service, store, _dir) = make_service();
        seed_sandwich(&store, "s1", 4.0, 2).await;

        let refs = service.create_review(base_input()).await.unwrap();
        assert_eq!(refs.sandwich_id, "s1");
        assert_eq!(refs.restaurant_id, "r1");

        let sandwich: Sandwich = store.get_as(SANDWICHES, "s1").await.unwrap().unwrap();
        assert_eq!(sandwich.review_count, 3);
        assert!((sandwich.average_rating - (4.0 * 2.0 + 5.0) / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_ingredient_union_is_case_folded_and_monotone() {
        let (service, store, _dir) = make_service();
        seed_sandwich(&store, "s1", 4.0, 1).await;

        let input = ReviewInput {
            ingredients: vec!["CHEESE".to_string(), " bacon ".to_string(), "".to_string()],
            ..base_input()
        };
        service.create_review(input).await.unwrap();

        let sandwich: Sandwich = store.get_as(SANDWICHES, "s1").await.unwrap().unwrap();
        assert_eq!(sandwich.ingredients, vec!["bacon".to_string(), "cheese".to_string()]);
    }

    #[tokio::test]
    async fn test_new_restaurant_and_sandwich_created_atomically() {
        let (service, store, _dir) = make_service();
        let input = ReviewInput {
            restaurant_id: NEW_SENTINEL.to_string(),
            sandwich_id: NEW_SENTINEL.to_string(),
            new_restaurant_name: Some("Lou's Diner".to_string()),
            new_restaurant_website: Some("https://lous.example".to_string()),
            new_sandwich_name: Some("The Classic".to_string()),
            ..base_input()
        };
        let refs = service.create_review(input).await.unwrap();
        assert_ne!(refs.restaurant_id, NEW_SENTINEL);
        assert_ne!(refs.sandwich_id, NEW_SENTINEL);

        let restaurant: Restaurant =
            store.get_as(RESTAURANTS, &refs.restaurant_id).await.unwrap().unwrap();
        assert_eq!(restaurant.name, "Lou's Diner");
        assert_eq!(restaurant.location, "Chicago, IL");
        assert_eq!(restaurant.website.as_deref(), Some("https://lous.example"));

        let sandwich: Sandwich =
            store.get_as(SANDWICHES, &refs.sandwich_id).await.unwrap().unwrap();
        assert_eq!(sandwich.restaurant_id, refs.restaurant_id);
        assert_eq!(sandwich.review_count, 1);
        assert!((sandwich.average_rating - 5.0).abs() < f64::EPSILON);

        let reviews = store.query_eq(REVIEWS, "sandwichId", &refs.sandwich_id).await.unwrap();
        assert_eq!(reviews.len(), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_reports_all_and_writes_nothing() {
        let (service, store, _dir) = make_service();
        let input = ReviewInput {
            rating: 10,
            user_id: String::new(),
            ..base_input()
        };
        let err = service.create_review(input).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Validation failed:"), "{msg}");
        assert!(msg.contains("Rating must be between 1 and 5"), "{msg}");
        assert!(msg.contains("User ID is required"), "{msg}");

        for collection in [RESTAURANTS, SANDWICHES, REVIEWS, INGREDIENTS] {
            assert!(store.list(collection).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_missing_sandwich_silently_skipped() {
        let (service, store, _dir) = make_service();
        let input = ReviewInput {
            sandwich_id: "ghost".to_string(),
            ..base_input()
        };
        let refs = service.create_review(input).await.unwrap();
        assert_eq!(refs.sandwich_id, "ghost");

        // No sandwich materialized, but the review exists against the id
        assert!(store.get(SANDWICHES, "ghost").await.unwrap().is_none());
        let reviews = store.query_eq(REVIEWS, "sandwichId", "ghost").await.unwrap();
        assert_eq!(reviews.len(), 1);
    }

    #[tokio::test]
    async fn test_photo_appended_and_promoted_only_when_unset() {
        let (service, store, _dir) = make_service();
        seed_sandwich(&store, "s1", 4.0, 1).await;

        let with_photo = |name: &str| ReviewInput {
            image_file: Some(ImageFile {
                file_name: name.to_string(),
                bytes: b"jpeg".to_vec(),
            }),
            ..base_input()
        };

        service.create_review(with_photo("a.jpg")).await.unwrap();
        let sandwich: Sandwich = store.get_as(SANDWICHES, "s1").await.unwrap().unwrap();
        let primary = sandwich.image_url.clone().unwrap();
        assert!(primary.ends_with("a.jpg"));
        assert_eq!(sandwich.all_photos.len(), 1);

        service.create_review(with_photo("b.jpg")).await.unwrap();
        let sandwich: Sandwich = store.get_as(SANDWICHES, "s1").await.unwrap().unwrap();
        // Second photo appends but never displaces the primary
        assert_eq!(sandwich.image_url.unwrap(), primary);
        assert_eq!(sandwich.all_photos.len(), 2);
        assert!(sandwich.all_photos[1].ends_with("b.jpg"));
    }

    #[tokio::test]
    async fn test_vocabulary_upserted_normalized() {
        let (service, store, _dir) = make_service();
        seed_sandwich(&store, "s1", 4.0, 1).await;
        service.create_review(base_input()).await.unwrap();

        let names = global_ingredients(&store).await.unwrap();
        assert_eq!(names, vec!["bacon".to_string(), "cheddar".to_string()]);

        // Resubmission is idempotent on the vocabulary
        service.create_review(base_input()).await.unwrap();
        let names = global_ingredients(&store).await.unwrap();
        assert_eq!(names.len(), 2);
    }

    #[tokio::test]
    async fn test_comment_markup_stripped() {
        let (service, store, _dir) = make_service();
        seed_sandwich(&store, "s1", 4.0, 1).await;
        let input = ReviewInput {
            comment: "<b>so</b> good <script>alert(1)</script>".to_string(),
            ..base_input()
        };
        service.create_review(input).await.unwrap();

        let reviews: Vec<Review> = store.query_eq_as(REVIEWS, "userId", "u1").await.unwrap();
        assert_eq!(reviews[0].comment, "so good alert(1)");
    }
}
