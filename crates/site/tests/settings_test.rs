#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Admin settings form tests: load, edit, validate, persist.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use trailbook_forms::InputEvent;
use trailbook_site::{SettingsStore, SiteSettings, settings_form};

/// In-memory stand-in for the settings endpoint.
#[derive(Default)]
struct MemoryStore {
    settings: Mutex<SiteSettings>,
    saves: Mutex<u32>,
    fail_next_save: Mutex<bool>,
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load(&self) -> Result<SiteSettings> {
        Ok(self.settings.lock().clone())
    }

    async fn save(&self, settings: &SiteSettings) -> Result<()> {
        if std::mem::take(&mut *self.fail_next_save.lock()) {
            return Err(anyhow!("PUT /api/settings returned 503"));
        }
        *self.settings.lock() = settings.clone();
        *self.saves.lock() += 1;
        Ok(())
    }
}

#[tokio::test]
async fn test_valid_submit_persists_through_store() {
    let store = Arc::new(MemoryStore::default());
    let initial = store.load().await.unwrap();
    let mut form = settings_form(&initial, Arc::clone(&store));

    form.handle_change(InputEvent::new("site_name", "Roads of Iberia"));
    form.handle_change(InputEvent::new("contact_email", "hi@roads.example"));
    form.handle_change(InputEvent::new("images_per_page", 12));

    assert!(form.submit().await);
    assert_eq!(*store.saves.lock(), 1);

    let saved = store.load().await.unwrap();
    assert_eq!(saved.site_name, "Roads of Iberia");
    assert_eq!(saved.contact_email, "hi@roads.example");
    assert_eq!(saved.images_per_page, 12);
}

#[tokio::test]
async fn test_invalid_submit_never_reaches_store() {
    let store = Arc::new(MemoryStore::default());
    let initial = store.load().await.unwrap();
    let mut form = settings_form(&initial, Arc::clone(&store));

    // Default settings ship with an empty contact email.
    assert!(!form.submit().await);
    assert_eq!(form.error("contact_email"), Some("contact_email is required"));
    assert_eq!(*store.saves.lock(), 0);
}

#[tokio::test]
async fn test_bad_email_blocks_save() {
    let store = Arc::new(MemoryStore::default());
    let initial = store.load().await.unwrap();
    let mut form = settings_form(&initial, Arc::clone(&store));

    form.handle_change(InputEvent::new("contact_email", "not-an-email"));
    assert!(!form.submit().await);
    assert_eq!(form.error("contact_email"), Some("Email is invalid"));
    assert_eq!(*store.saves.lock(), 0);
}

#[tokio::test]
async fn test_images_per_page_range() {
    let store = Arc::new(MemoryStore::default());
    let initial = store.load().await.unwrap();
    let mut form = settings_form(&initial, Arc::clone(&store));

    form.handle_change(InputEvent::new("contact_email", "hi@roads.example"));
    form.handle_change(InputEvent::new("images_per_page", 500));

    assert!(!form.submit().await);
    assert_eq!(
        form.error("images_per_page"),
        Some("images_per_page must be between 1 and 100")
    );

    // Zero counts as empty, so the required rule reports it.
    form.handle_change(InputEvent::new("images_per_page", 0));
    assert!(!form.submit().await);
    assert_eq!(
        form.error("images_per_page"),
        Some("images_per_page is required")
    );
}

#[tokio::test]
async fn test_store_failure_is_not_a_field_error() {
    let store = Arc::new(MemoryStore::default());
    let initial = store.load().await.unwrap();
    let mut form = settings_form(&initial, Arc::clone(&store));

    form.handle_change(InputEvent::new("contact_email", "hi@roads.example"));
    *store.fail_next_save.lock() = true;

    // The handler ran and failed; the failure is logged, not mapped into
    // the error map, and nothing was persisted.
    assert!(form.submit().await);
    assert!(form.errors().is_empty());
    assert_eq!(*store.saves.lock(), 0);
}

#[tokio::test]
async fn test_form_seeds_from_loaded_settings() {
    let store = Arc::new(MemoryStore::default());
    {
        let mut settings = store.settings.lock();
        settings.site_name = "Saved Name".to_string();
        settings.contact_email = "kept@site.example".to_string();
    }

    let initial = store.load().await.unwrap();
    let form = settings_form(&initial, Arc::clone(&store));

    assert_eq!(form.value("site_name"), Some(&json!("Saved Name")));
    assert_eq!(form.value("contact_email"), Some(&json!("kept@site.example")));
}
