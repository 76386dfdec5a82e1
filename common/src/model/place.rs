use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A point of interest as stored in the directory.
///
/// `id` is assigned by the store and never changes. `place_id` is the external
/// identifier imports use to target updates and deletions; `cid` is the
/// external cluster identifier shared by near-duplicate records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub place_id: Option<String>,
    pub cid: Option<String>,
    pub title: String,
    pub address: String,
    pub category: String,
    pub governorate: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: f64,
    pub reviews: i64,
    /// Display ordering, 0 when unknown.
    pub position: i64,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    /// Free-form opening hours, either a day list or a day→hours object.
    pub opening_hours: Option<Value>,
    pub price_range: Option<String>,
    pub thumbnail_url: Option<String>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    pub types: Vec<String>,
    pub rating_count: Option<i64>,
    pub grid_lat: Option<f64>,
    pub grid_lng: Option<f64>,
    pub fid: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Place {
    pub fn has_phone(&self) -> bool {
        has_text(&self.phone_number)
    }

    pub fn has_website(&self) -> bool {
        has_text(&self.website)
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Body of `POST /api/places`.
///
/// Every field is optional at the wire level so that a missing required field
/// surfaces as a validation message instead of a deserialisation failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceInput {
    pub title: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub governorate: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub reviews: Option<i64>,
    pub position: Option<i64>,
    pub place_id: Option<String>,
    pub cid: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<Value>,
    pub price_range: Option<String>,
    pub thumbnail_url: Option<String>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    pub types: Option<Vec<String>>,
    pub rating_count: Option<i64>,
    pub grid_lat: Option<f64>,
    pub grid_lng: Option<f64>,
    pub fid: Option<String>,
}

/// Body of `PATCH /api/places/{id}`: only the fields that are present change.
pub type PlacePatch = PlaceInput;

/// Acknowledgement returned by `DELETE /api/places/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub message: String,
}
