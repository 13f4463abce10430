//! Trip image records and the gallery filter.
//!
//! The public gallery narrows a trip's images by country, year, tag, or
//! free-text title search. Criteria are declarative and AND-composed;
//! filtering is pure and keeps the input order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coordinates for the map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A photo attached to a trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripImage {
    /// Unique image id.
    pub id: Uuid,

    /// Caption shown under the image.
    pub title: String,

    /// Country the photo was taken in.
    pub country: String,

    /// Year of the trip.
    pub year: i32,

    /// Free-form tags ("beach", "hike", ...).
    #[serde(default)]
    pub tags: Vec<String>,

    /// When the photo was taken.
    pub taken_at: DateTime<Utc>,

    /// Where the photo was taken, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

/// Criteria for narrowing the gallery.
///
/// Unset criteria pass everything; set criteria must all match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalleryFilter {
    /// Exact country, case-insensitive.
    pub country: Option<String>,

    /// Exact trip year.
    pub year: Option<i32>,

    /// Image must carry this tag, case-insensitive.
    pub tag: Option<String>,

    /// Substring of the title, case-insensitive.
    pub search: Option<String>,
}

impl GalleryFilter {
    /// Create a filter that passes everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a country.
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Restrict to a trip year.
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Restrict to images carrying a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Restrict to titles containing a search string.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Reset all criteria.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether no criteria are set.
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.year.is_none() && self.tag.is_none() && self.search.is_none()
    }

    /// Whether an image satisfies every set criterion.
    pub fn matches(&self, image: &TripImage) -> bool {
        if let Some(country) = &self.country {
            if !image.country.eq_ignore_ascii_case(country) {
                return false;
            }
        }
        if let Some(year) = self.year {
            if image.year != year {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !image.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !image.title.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }

    /// The matching subset of `images`, preserving input order.
    pub fn apply<'a>(&self, images: &'a [TripImage]) -> Vec<&'a TripImage> {
        images.iter().filter(|image| self.matches(image)).collect()
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn image(title: &str, country: &str, year: i32, tags: &[&str]) -> TripImage {
        TripImage {
            id: Uuid::now_v7(),
            title: title.to_string(),
            country: country.to_string(),
            year,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            taken_at: Utc::now(),
            location: None,
        }
    }

    fn fixtures() -> Vec<TripImage> {
        vec![
            image("Sunset at Praia da Marinha", "Portugal", 2023, &["beach"]),
            image("Alfama rooftops", "Portugal", 2024, &["city"]),
            image("Hallstatt in the rain", "Austria", 2024, &["village", "lake"]),
            image("Dolomites ridge hike", "Italy", 2023, &["hike"]),
        ]
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let images = fixtures();
        let filter = GalleryFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&images).len(), images.len());
    }

    #[test]
    fn test_country_is_case_insensitive() {
        let images = fixtures();
        let filter = GalleryFilter::new().country("portugal");
        assert_eq!(filter.apply(&images).len(), 2);
    }

    #[test]
    fn test_criteria_and_together() {
        let images = fixtures();
        let filter = GalleryFilter::new().country("Portugal").year(2024);
        let matched = filter.apply(&images);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Alfama rooftops");
    }

    #[test]
    fn test_tag_matches_any_of_the_images_tags() {
        let images = fixtures();
        let filter = GalleryFilter::new().tag("LAKE");
        let matched = filter.apply(&images);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].country, "Austria");
    }

    #[test]
    fn test_search_is_substring_on_title() {
        let images = fixtures();
        let filter = GalleryFilter::new().search("rooftops");
        assert_eq!(filter.apply(&images).len(), 1);

        let filter = GalleryFilter::new().search("ROOFTOPS");
        assert_eq!(filter.apply(&images).len(), 1);
    }

    #[test]
    fn test_apply_preserves_input_order() {
        let images = fixtures();
        let filter = GalleryFilter::new().year(2023);
        let matched = filter.apply(&images);
        let titles: Vec<_> = matched.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Sunset at Praia da Marinha", "Dolomites ridge hike"]);
    }

    #[test]
    fn test_clear_resets_criteria() {
        let images = fixtures();
        let mut filter = GalleryFilter::new().country("Portugal").tag("beach");
        assert_eq!(filter.apply(&images).len(), 1);

        filter.clear();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&images).len(), images.len());
    }

    #[test]
    fn test_image_serialization_skips_missing_location() {
        let img = image("Untitled", "Japan", 2022, &[]);
        let json = serde_json::to_string(&img).unwrap();
        assert!(!json.contains("location"));

        let located = TripImage {
            location: Some(GeoPoint {
                latitude: 38.7,
                longitude: -9.1,
            }),
            ..image("Tram 28", "Portugal", 2024, &["city"])
        };
        let json = serde_json::to_string(&located).unwrap();
        let parsed: TripImage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.location, Some(GeoPoint { latitude: 38.7, longitude: -9.1 }));
    }
}
