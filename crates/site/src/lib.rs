//! Trailbook application pieces built on the form toolkit.
//!
//! - Site settings: the admin panel's settings record, its validation
//!   schema, and the storage contract behind the settings endpoint.
//! - Gallery: trip image records and the filter driving the public
//!   gallery view.

pub mod gallery;
pub mod settings;

pub use gallery::{GalleryFilter, GeoPoint, TripImage};
pub use settings::{
    Notice, NoticeLevel, SaveSettings, SettingsError, SettingsStore, SiteSettings,
    settings_form, settings_schema,
};
