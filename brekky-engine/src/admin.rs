//! Moderation Service
//!
//! Cascading deletes and edit operations for moderators. Cascades run as
//! write batches: cheap bulk cleanup without conflict detection, acceptable
//! because moderation is rare and a re-run converges.
//!
//! The ingredient vocabulary is decoupled from sandwich and review data, so
//! pruning a vocabulary entry never rewrites documents that mention it.

use crate::store::DocumentStore;
use chrono::Utc;
use serde_json::{json, Value};
use shared::models::{RestaurantUpdate, SandwichUpdate};
use shared::AppResult;
use std::sync::Arc;

const RESTAURANTS: &str = "restaurants";
const SANDWICHES: &str = "sandwiches";
const REVIEWS: &str = "reviews";
const INGREDIENTS: &str = "ingredients";

pub struct AdminService {
    store: Arc<DocumentStore>,
}

impl AdminService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Delete every review of one sandwich. Returns the number deleted.
    pub async fn delete_sandwich_reviews(&self, sandwich_id: &str) -> AppResult<usize> {
        let reviews = self.store.query_eq(REVIEWS, "sandwichId", sandwich_id).await?;
        let mut batch = self.store.batch();
        for review in &reviews {
            if let Some(id) = review.get("id").and_then(Value::as_str) {
                batch.delete(REVIEWS, id);
            }
        }
        let count = batch.len();
        batch.commit().await?;
        tracing::info!(sandwich_id, count, "sandwich reviews deleted");
        Ok(count)
    }

    /// Delete a sandwich and all of its reviews
    pub async fn delete_sandwich_cascading(&self, sandwich_id: &str) -> AppResult<()> {
        self.delete_sandwich_reviews(sandwich_id).await?;
        self.store.delete(SANDWICHES, sandwich_id).await?;
        tracing::info!(sandwich_id, "sandwich deleted");
        Ok(())
    }

    /// Delete every sandwich of one restaurant, reviews included. Returns
    /// the number of sandwiches deleted.
    pub async fn delete_restaurant_sandwiches(&self, restaurant_id: &str) -> AppResult<usize> {
        let sandwiches = self
            .store
            .query_eq(SANDWICHES, "restaurantId", restaurant_id)
            .await?;
        let mut count = 0;
        for sandwich in &sandwiches {
            if let Some(id) = sandwich.get("id").and_then(Value::as_str) {
                self.delete_sandwich_cascading(id).await?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Delete a restaurant and everything under it
    pub async fn delete_restaurant_cascading(&self, restaurant_id: &str) -> AppResult<()> {
        self.delete_restaurant_sandwiches(restaurant_id).await?;
        self.store.delete(RESTAURANTS, restaurant_id).await?;
        tracing::info!(restaurant_id, "restaurant deleted");
        Ok(())
    }

    /// Prune one vocabulary entry. Sandwich and review ingredient lists keep
    /// their copies; only the autocomplete pool shrinks.
    pub async fn delete_ingredient(&self, name: &str) -> AppResult<()> {
        self.store.delete(INGREDIENTS, name).await?;
        tracing::info!(name, "ingredient pruned from vocabulary");
        Ok(())
    }

    /// Apply the admin restaurant edit modal, stamping `updatedAt`
    pub async fn update_restaurant(&self, id: &str, patch: &RestaurantUpdate) -> AppResult<()> {
        let mut fields = crate::store::to_object(patch)?;
        fields.retain(|_, v| !v.is_null());
        fields.insert("updatedAt".to_string(), json!(Utc::now()));
        self.store.update(RESTAURANTS, id, &Value::Object(fields)).await
    }

    /// Apply the admin sandwich edit modal, stamping `updatedAt`
    pub async fn update_sandwich(&self, id: &str, patch: &SandwichUpdate) -> AppResult<()> {
        let mut fields = crate::store::to_object(patch)?;
        fields.retain(|_, v| !v.is_null());
        fields.insert("updatedAt".to_string(), json!(Utc::now()));
        self.store.update(SANDWICHES, id, &Value::Object(fields)).await
    }
}
