//! User Profile Service
//!
//! Profile fetch/update and avatar upload. Badge persistence lives in the
//! badge updater; this module only touches the editable profile surface.

use crate::blob::BlobStore;
use crate::sanitize::{sanitize_text, sanitize_url};
use crate::store::DocumentStore;
use crate::validation::{validate_input, ImageFile, UserProfileInput};
use chrono::Utc;
use serde_json::json;
use shared::models::UserProfile;
use shared::AppResult;
use std::sync::Arc;

const USERS: &str = "users";

pub struct UserService {
    store: Arc<DocumentStore>,
    blobs: Arc<BlobStore>,
}

impl UserService {
    pub fn new(store: Arc<DocumentStore>, blobs: Arc<BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Fetch a profile. Lookup and decode failures are logged and swallowed
    /// into `None` so a corrupt profile document degrades to "not signed up"
    /// instead of erroring every page.
    pub async fn get_user_profile(&self, uid: &str) -> Option<UserProfile> {
        match self.store.get_as::<UserProfile>(USERS, uid).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!(uid, error = %e, "profile fetch failed");
                None
            }
        }
    }

    /// Apply the profile settings form: validate, sanitize, stamp
    /// `lastUpdated`. Fails if the profile does not exist.
    pub async fn update_user_profile(&self, uid: &str, input: &UserProfileInput) -> AppResult<()> {
        validate_input(input)?;

        let mut patch = serde_json::Map::new();
        patch.insert("displayName".to_string(), json!(sanitize_text(&input.display_name)));
        if let Some(location) = &input.location {
            patch.insert("location".to_string(), json!(sanitize_text(location)));
        }
        if let Some(bio) = &input.bio {
            patch.insert("bio".to_string(), json!(sanitize_text(bio)));
        }
        if let Some(photo_url) = &input.photo_url {
            patch.insert("photoURL".to_string(), json!(sanitize_url(photo_url)));
        }
        patch.insert("lastUpdated".to_string(), json!(Utc::now()));

        self.store
            .update(USERS, uid, &serde_json::Value::Object(patch))
            .await?;
        tracing::info!(uid, "profile updated");
        Ok(())
    }

    /// Upload an avatar image and return its public URL
    pub async fn upload_avatar(&self, uid: &str, file: &ImageFile) -> AppResult<String> {
        let timestamp = Utc::now().timestamp_millis();
        let path = format!("avatars/{uid}/{timestamp}_{}", file.file_name);
        self.blobs.upload(&path, &file.bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::AppError;

    fn make_service() -> (UserService, Arc<DocumentStore>, tempfile::TempDir) {
        let store = Arc::new(DocumentStore::new());
        let dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(BlobStore::new(dir.path()));
        (UserService::new(store.clone(), blobs), store, dir)
    }

    async fn seed_profile(store: &DocumentStore, uid: &str) {
        store
            .set(
                USERS,
                uid,
                &json!({
                    "uid": uid,
                    "email": "sam@example.com",
                    "displayName": "Sam",
                    "badges": ["founder"],
                }),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_sanitizes_and_stamps() {
        let (service, store, _dir) = make_service();
        seed_profile(&store, "u1").await;

        let input = UserProfileInput {
            display_name: "<b>Sam</b>".to_string(),
            bio: Some("Sandwich hunter".to_string()),
            photo_url: Some("https://cdn.example/me.png".to_string()),
            ..Default::default()
        };
        service.update_user_profile("u1", &input).await.unwrap();

        let profile = service.get_user_profile("u1").await.unwrap();
        assert_eq!(profile.display_name, "Sam");
        assert_eq!(profile.bio.as_deref(), Some("Sandwich hunter"));
        assert_eq!(profile.photo_url, "https://cdn.example/me.png");
        assert!(profile.last_updated.is_some());
        // Untouched fields survive the patch
        assert_eq!(profile.badges, vec!["founder".to_string()]);
    }

    #[tokio::test]
    async fn test_update_missing_profile_fails() {
        let (service, _store, _dir) = make_service();
        let input = UserProfileInput {
            display_name: "Sam".to_string(),
            ..Default::default()
        };
        let err = service.update_user_profile("ghost", &input).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_input() {
        let (service, store, _dir) = make_service();
        seed_profile(&store, "u1").await;
        let input = UserProfileInput {
            display_name: String::new(),
            ..Default::default()
        };
        let err = service.update_user_profile("u1", &input).await.unwrap_err();
        assert!(err.to_string().contains("Display name is required"));
    }

    #[tokio::test]
    async fn test_corrupt_profile_degrades_to_none() {
        let (service, store, _dir) = make_service();
        // Missing required fields, decode fails
        store.set(USERS, "u1", &json!({"uid": "u1"})).await.unwrap();
        assert!(service.get_user_profile("u1").await.is_none());
    }

    #[tokio::test]
    async fn test_avatar_upload_returns_public_url() {
        let (service, _store, _dir) = make_service();
        let file = ImageFile {
            file_name: "me.png".to_string(),
            bytes: b"png".to_vec(),
        };
        let url = service.upload_avatar("u1", &file).await.unwrap();
        assert!(url.starts_with("/uploads/avatars/u1/"));
        assert!(url.ends_with("_me.png"));
    }
}
