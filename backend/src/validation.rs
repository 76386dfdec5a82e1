//! Field-level validation shared by the import pipeline and the create/update
//! endpoints.
//!
//! Input first becomes a [`PlaceFields`] (typed, every value already coerced),
//! then [`validate`] checks it against presence, range and enumeration rules.
//! Every rule runs independently so one call reports every violation.

use crate::db::places::NewPlace;
use common::constants::{is_category, is_governorate, CATEGORIES, GOVERNORATES};
use common::model::place::{Place, PlaceInput};
use serde_json::Value;

/// Fields that must be present before a place may be stored.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "title",
    "category",
    "governorate",
    "address",
    "latitude",
    "longitude",
];

/// A numeric input after coercion.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Numeric {
    #[default]
    Missing,
    /// Present but not a number; keeps the raw text for diagnostics.
    Malformed(String),
    Value(f64),
}

impl Numeric {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Numeric::Missing,
            Some(text) => match text.parse::<f64>() {
                Ok(v) if v.is_finite() => Numeric::Value(v),
                _ => Numeric::Malformed(text.to_string()),
            },
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Numeric::Missing)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Numeric::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// `Some` only for whole numbers.
    pub fn integer(&self) -> Option<i64> {
        self.value()
            .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
            .map(|v| v as i64)
    }
}

impl From<Option<f64>> for Numeric {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Numeric::Value(v),
            Some(v) => Numeric::Malformed(v.to_string()),
            None => Numeric::Missing,
        }
    }
}

impl From<Option<i64>> for Numeric {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Numeric::Missing, |v| Numeric::Value(v as f64))
    }
}

/// Place attributes as they arrive from a spreadsheet row or a request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceFields {
    pub place_id: Option<String>,
    pub cid: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub governorate: Option<String>,
    pub address: Option<String>,
    pub latitude: Numeric,
    pub longitude: Numeric,
    pub rating: Numeric,
    pub reviews: Numeric,
    pub position: Numeric,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub thumbnail_url: Option<String>,
    pub price_range: Option<String>,
    pub opening_hours: Option<Value>,
    pub place_type: Option<String>,
    pub types: Option<Vec<String>>,
    pub rating_count: Option<i64>,
    pub grid_lat: Option<f64>,
    pub grid_lng: Option<f64>,
    pub fid: Option<String>,
}

/// Verdict of [`validate`]: valid exactly when `errors` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn text_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Which fields are held to their enumerations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EnumChecks {
    category: bool,
    governorate: bool,
}

impl EnumChecks {
    const ALL: EnumChecks = EnumChecks {
        category: true,
        governorate: true,
    };
}

pub fn validate(fields: &PlaceFields) -> Validation {
    check(fields, EnumChecks::ALL)
}

fn check(fields: &PlaceFields, enums: EnumChecks) -> Validation {
    let mut errors = Vec::new();

    let presence = [
        ("title", text_present(&fields.title)),
        ("category", text_present(&fields.category)),
        ("governorate", text_present(&fields.governorate)),
        ("address", text_present(&fields.address)),
        ("latitude", fields.latitude.is_present()),
        ("longitude", fields.longitude.is_present()),
    ];
    for (field, present) in presence {
        if !present {
            errors.push(format!("{field} is required"));
        }
    }

    if fields.latitude.is_present()
        && !fields
            .latitude
            .value()
            .is_some_and(|lat| (-90.0..=90.0).contains(&lat))
    {
        errors.push("latitude must be between -90 and 90".to_string());
    }
    if fields.longitude.is_present()
        && !fields
            .longitude
            .value()
            .is_some_and(|lng| (-180.0..=180.0).contains(&lng))
    {
        errors.push("longitude must be between -180 and 180".to_string());
    }

    if let Some(category) = fields.category.as_deref().map(str::trim) {
        if enums.category && !category.is_empty() && !is_category(category) {
            errors.push(format!("category must be one of: {}", CATEGORIES.join(", ")));
        }
    }
    if let Some(governorate) = fields.governorate.as_deref().map(str::trim) {
        if enums.governorate && !governorate.is_empty() && !is_governorate(governorate) {
            errors.push(format!(
                "governorate must be one of: {}",
                GOVERNORATES.join(", ")
            ));
        }
    }

    if fields.rating.is_present()
        && !fields
            .rating
            .value()
            .is_some_and(|r| (0.0..=5.0).contains(&r))
    {
        errors.push("rating must be between 0 and 5".to_string());
    }
    if fields.reviews.is_present() && !fields.reviews.integer().is_some_and(|r| r >= 0) {
        errors.push("reviews must be a non-negative integer".to_string());
    }
    if fields.position.is_present() && fields.position.integer().is_none() {
        errors.push("position must be an integer".to_string());
    }

    Validation { errors }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl PlaceFields {
    /// Validates and, when every rule passes, produces the record to store.
    pub fn into_new_place(self) -> Result<NewPlace, Validation> {
        let verdict = validate(&self);
        self.build(verdict)
    }

    /// Merges `patch` onto the stored place and validates the result.
    ///
    /// Category and governorate are only held to their enumerations when the
    /// patch sets them: a stored value outside the lists (the seeding
    /// placeholder, for one) stays editable through unrelated fields.
    pub fn patched(place: &Place, patch: PlaceInput) -> Result<NewPlace, Validation> {
        let enums = EnumChecks {
            category: patch.category.is_some(),
            governorate: patch.governorate.is_some(),
        };
        let merged = Self::merged(place, patch);
        let verdict = check(&merged, enums);
        merged.build(verdict)
    }

    fn build(self, verdict: Validation) -> Result<NewPlace, Validation> {
        if !verdict.is_valid() {
            return Err(verdict);
        }

        let (Some(latitude), Some(longitude)) = (self.latitude.value(), self.longitude.value())
        else {
            return Err(verdict);
        };

        Ok(NewPlace {
            place_id: trimmed(self.place_id),
            cid: trimmed(self.cid),
            title: trimmed(self.title).unwrap_or_default(),
            address: trimmed(self.address).unwrap_or_default(),
            category: trimmed(self.category).unwrap_or_default(),
            governorate: trimmed(self.governorate).unwrap_or_default(),
            latitude,
            longitude,
            rating: self.rating.value().unwrap_or(0.0),
            reviews: self.reviews.integer().unwrap_or(0),
            position: self.position.integer().unwrap_or(0),
            phone_number: trimmed(self.phone_number),
            website: trimmed(self.website),
            opening_hours: self.opening_hours,
            price_range: trimmed(self.price_range),
            thumbnail_url: trimmed(self.thumbnail_url),
            place_type: trimmed(self.place_type),
            types: self.types,
            rating_count: self.rating_count,
            grid_lat: self.grid_lat,
            grid_lng: self.grid_lng,
            fid: trimmed(self.fid),
        })
    }

    /// The stored place with `patch` applied on top; absent patch fields keep
    /// the stored value.
    fn merged(place: &Place, patch: PlaceInput) -> Self {
        PlaceFields {
            place_id: patch.place_id.or_else(|| place.place_id.clone()),
            cid: patch.cid.or_else(|| place.cid.clone()),
            title: Some(patch.title.unwrap_or_else(|| place.title.clone())),
            category: Some(patch.category.unwrap_or_else(|| place.category.clone())),
            governorate: Some(
                patch
                    .governorate
                    .unwrap_or_else(|| place.governorate.clone()),
            ),
            address: Some(patch.address.unwrap_or_else(|| place.address.clone())),
            latitude: Numeric::from(Some(patch.latitude.unwrap_or(place.latitude))),
            longitude: Numeric::from(Some(patch.longitude.unwrap_or(place.longitude))),
            rating: Numeric::from(Some(patch.rating.unwrap_or(place.rating))),
            reviews: Numeric::from(Some(patch.reviews.unwrap_or(place.reviews))),
            position: Numeric::from(Some(patch.position.unwrap_or(place.position))),
            phone_number: patch.phone_number.or_else(|| place.phone_number.clone()),
            website: patch.website.or_else(|| place.website.clone()),
            thumbnail_url: patch.thumbnail_url.or_else(|| place.thumbnail_url.clone()),
            price_range: patch.price_range.or_else(|| place.price_range.clone()),
            opening_hours: patch.opening_hours.or_else(|| place.opening_hours.clone()),
            place_type: patch.place_type.or_else(|| place.place_type.clone()),
            types: Some(patch.types.unwrap_or_else(|| place.types.clone())),
            rating_count: patch.rating_count.or(place.rating_count),
            grid_lat: patch.grid_lat.or(place.grid_lat),
            grid_lng: patch.grid_lng.or(place.grid_lng),
            fid: patch.fid.or_else(|| place.fid.clone()),
        }
    }
}

impl From<PlaceInput> for PlaceFields {
    fn from(input: PlaceInput) -> Self {
        PlaceFields {
            place_id: input.place_id,
            cid: input.cid,
            title: input.title,
            category: input.category,
            governorate: input.governorate,
            address: input.address,
            latitude: input.latitude.into(),
            longitude: input.longitude.into(),
            rating: input.rating.into(),
            reviews: input.reviews.into(),
            position: input.position.into(),
            phone_number: input.phone_number,
            website: input.website,
            thumbnail_url: input.thumbnail_url,
            price_range: input.price_range,
            opening_hours: input.opening_hours,
            place_type: input.place_type,
            types: input.types,
            rating_count: input.rating_count,
            grid_lat: input.grid_lat,
            grid_lng: input.grid_lng,
            fid: input.fid,
        }
    }
}
