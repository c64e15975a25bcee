//! Content API payload types.

use serde::{Deserialize, Serialize};

/// Envelope wrapping every items response from the API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemsResponse<T> {
    /// Matching records.
    pub data: Vec<T>,
}

/// A catalogued place with its travel story.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Place {
    /// Record ID.
    pub id: i64,
    /// Publication status (`published` records are the only ones fetched).
    pub status: String,
    /// Display name; route slugs are derived from it.
    pub name: String,
    /// Visit date, ISO 8601 date string.
    pub date: String,
    /// Location of the place.
    pub point: GeoPoint,
    /// File ID of the thumbnail asset.
    pub thumbnail: String,
    /// Story HTML with embedded asset references.
    pub story: String,
}

/// GeoJSON point.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeoPoint {
    /// Geometry type (always `Point`).
    #[serde(rename = "type")]
    pub point_type: String,
    /// Longitude, latitude.
    pub coordinates: [f64; 2],
}

/// Site introduction text shown on the home page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Introduction {
    /// Introduction HTML.
    pub text: String,
}
