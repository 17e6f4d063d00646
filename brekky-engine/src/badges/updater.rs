//! Badge Updater
//!
//! Orchestration around the pure engine: fetch the profile and review
//! history, recompute, merge instant-achievement hints, and write back only
//! when the badge set actually changed. Used both directly (retroactive
//! batch driver) and as a detached post-submission task whose failures only
//! ever reach the logger.

use crate::badges::engine::calculate_eligible_badges;
use crate::store::DocumentStore;
use chrono::Utc;
use serde_json::json;
use shared::models::{Review, UserProfile};
use shared::AppResult;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Collection names
const USERS: &str = "users";
const REVIEWS: &str = "reviews";

/// Badge recomputation service
pub struct BadgeService {
    store: Arc<DocumentStore>,
}

impl BadgeService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Recompute and persist a user's badge set.
    ///
    /// `new_achievements` carries one-time hints from the triggering event
    /// (`first_restaurant` / `first_sandwich`); they are unioned into the
    /// computed set. The store write is skipped when the computed set equals
    /// the stored one compared as unordered sets. Returns the current badge
    /// list; a missing profile is a no-op.
    pub async fn update_user_badges(
        &self,
        uid: &str,
        new_achievements: &[String],
    ) -> AppResult<Vec<String>> {
        let Some(profile) = self.store.get_as::<UserProfile>(USERS, uid).await? else {
            tracing::debug!(uid, "badge recompute skipped, no profile");
            return Ok(Vec::new());
        };

        let reviews: Vec<Review> = self.store.query_eq_as(REVIEWS, "userId", uid).await?;
        let mut earned = calculate_eligible_badges(uid, &reviews, &profile);

        for achievement in new_achievements {
            if !earned.contains(achievement) {
                earned.push(achievement.clone());
            }
        }

        let current: BTreeSet<&str> = profile.badges.iter().map(String::as_str).collect();
        let computed: BTreeSet<&str> = earned.iter().map(String::as_str).collect();
        if current == computed {
            return Ok(profile.badges);
        }

        self.store
            .update(
                USERS,
                uid,
                &json!({
                    "badges": earned,
                    "lastUpdated": Utc::now(),
                }),
            )
            .await?;
        tracing::info!(uid, badges = earned.len(), "badge set updated");
        Ok(earned)
    }

    /// Fire-and-forget recompute after a review submission.
    ///
    /// Detached task; a failure is logged and dropped so it can never fail
    /// the submission that triggered it.
    pub fn spawn_recompute(self: &Arc<Self>, uid: String, new_achievements: Vec<String>) {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = service.update_user_badges(&uid, &new_achievements).await {
                tracing::error!(uid, error = %e, "badge recompute failed");
            }
        });
    }
}
