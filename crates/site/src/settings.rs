//! Site settings record, storage contract, and the admin settings form.
//!
//! The admin panel edits one site-wide settings record. The record lives
//! behind a GET/PUT endpoint pair; this module expresses that contract as
//! the [`SettingsStore`] trait so the form wiring stays independent of
//! the HTTP client.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use trailbook_forms::{FormState, FormValues, Rule, SubmitHandler, ValidationSchema};

/// Site-wide settings managed from the admin panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Site name shown in the header and page titles.
    pub site_name: String,

    /// Contact address shown in the site footer.
    pub contact_email: String,

    /// Introductory text for the front page.
    #[serde(default)]
    pub intro_text: String,

    /// Trip images per gallery page.
    pub images_per_page: u32,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Trailbook".to_string(),
            contact_email: String::new(),
            intro_text: String::new(),
            images_per_page: 24,
        }
    }
}

impl SiteSettings {
    /// Flatten into form values for editing.
    pub fn to_values(&self) -> FormValues {
        [
            ("site_name", json!(self.site_name)),
            ("contact_email", json!(self.contact_email)),
            ("intro_text", json!(self.intro_text)),
            ("images_per_page", json!(self.images_per_page)),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }

    /// Rebuild a settings record from submitted form values.
    pub fn from_values(values: &FormValues) -> Result<Self, SettingsError> {
        Ok(Self {
            site_name: string_field(values, "site_name")?,
            contact_email: string_field(values, "contact_email")?,
            intro_text: string_field(values, "intro_text").unwrap_or_default(),
            images_per_page: values
                .get("images_per_page")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(SettingsError::InvalidField("images_per_page"))?,
        })
    }
}

fn string_field(values: &FormValues, name: &'static str) -> Result<String, SettingsError> {
    values
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(SettingsError::InvalidField(name))
}

/// Errors converting form values back into a settings record.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A field was missing or had the wrong value kind.
    #[error("missing or invalid field: {0}")]
    InvalidField(&'static str),
}

/// Validation schema for the settings form.
pub fn settings_schema() -> ValidationSchema {
    ValidationSchema::new()
        .field(
            "site_name",
            [Rule::Required, Rule::MinLength(2), Rule::MaxLength(80)],
        )
        .field("contact_email", [Rule::Required, Rule::Email])
        .rule("intro_text", Rule::MaxLength(500))
        .field(
            "images_per_page",
            [
                Rule::Required,
                Rule::custom(|value, _| match value.as_u64() {
                    Some(1..=100) => None,
                    _ => Some("images_per_page must be between 1 and 100".to_string()),
                }),
            ],
        )
}

/// Storage contract for site settings: the GET/PUT endpoint pair behind
/// the admin panel, expressed as a trait seam.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load the current settings.
    async fn load(&self) -> Result<SiteSettings>;

    /// Persist new settings.
    async fn save(&self, settings: &SiteSettings) -> Result<()>;
}

/// Submit handler that parses validated form values back into
/// [`SiteSettings`] and persists them through the store.
pub struct SaveSettings<S> {
    store: Arc<S>,
}

impl<S> SaveSettings<S> {
    /// Wrap a store for use as a form submit handler.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: SettingsStore> SubmitHandler for SaveSettings<S> {
    async fn submit(&self, values: &FormValues) -> Result<()> {
        let settings = SiteSettings::from_values(values)?;
        self.store.save(&settings).await?;
        debug!(site_name = %settings.site_name, "site settings saved");
        Ok(())
    }
}

/// Build the admin settings form, seeded from the given record and wired
/// to save through the store on valid submission.
pub fn settings_form<S>(initial: &SiteSettings, store: Arc<S>) -> FormState
where
    S: SettingsStore + 'static,
{
    FormState::new(
        initial.to_values(),
        settings_schema(),
        Arc::new(SaveSettings::new(store)),
    )
}

/// Severity of a notification banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A notification banner for the admin UI, driven by the outcome of a
/// settings submission. Rendering is the embedder's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    /// Banner severity.
    pub level: NoticeLevel,

    /// Human-readable banner text.
    pub message: String,
}

impl Notice {
    /// Create a success banner.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Create an error banner.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
