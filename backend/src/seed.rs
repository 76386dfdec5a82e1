//! Loads a raw scraped dataset (a JSON array of places) into the store.

use crate::db::places::{self, NewPlace};
use crate::db::StoreError;
use chrono::Utc;
use common::constants::UNSPECIFIED;
use log::{error, info};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

pub const SEED_BATCH_SIZE: usize = 500;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("could not parse dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database already contains {0} places; pass --replace to reimport")]
    NotEmpty(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One record of the scraped dataset. Everything is optional; records missing
/// a title, address or coordinates are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlace {
    pub position: Option<i64>,
    pub title: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub rating_count: Option<i64>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    pub types: Option<Vec<String>>,
    pub phone_number: Option<String>,
    pub opening_hours: Option<Value>,
    pub thumbnail_url: Option<String>,
    pub cid: Option<String>,
    pub fid: Option<String>,
    pub place_id: Option<String>,
    pub category: Option<String>,
    pub governorate: Option<String>,
    #[serde(rename = "grid_lat")]
    pub grid_lat: Option<f64>,
    #[serde(rename = "grid_lng")]
    pub grid_lng: Option<f64>,
    pub website: Option<String>,
    pub price_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFailure {
    /// Position in the dataset; for a failed batch, its first record.
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<SeedFailure>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A day list becomes `{"day0": .., "day1": ..}`; objects are kept as-is.
fn normalize_opening_hours(hours: Value) -> Value {
    match hours {
        Value::Array(days) => Value::Object(
            days.into_iter()
                .enumerate()
                .map(|(i, day)| (format!("day{i}"), day))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

pub fn transform(raw: RawPlace) -> Option<NewPlace> {
    let title = non_blank(raw.title)?;
    let address = non_blank(raw.address)?;
    let latitude = raw.latitude?;
    let longitude = raw.longitude?;

    let cid = non_blank(raw.cid);
    let category = non_blank(raw.category)
        .or_else(|| non_blank(raw.place_type.clone()))
        .unwrap_or_else(|| UNSPECIFIED.to_string());

    Some(NewPlace {
        place_id: non_blank(raw.place_id).or_else(|| cid.clone()),
        cid,
        title,
        address,
        category,
        governorate: non_blank(raw.governorate).unwrap_or_else(|| UNSPECIFIED.to_string()),
        latitude,
        longitude,
        rating: raw.rating.unwrap_or(0.0),
        reviews: raw.rating_count.unwrap_or(0),
        position: raw.position.unwrap_or(0),
        phone_number: non_blank(raw.phone_number),
        website: non_blank(raw.website),
        opening_hours: raw
            .opening_hours
            .filter(|h| !h.is_null())
            .map(normalize_opening_hours),
        price_range: non_blank(raw.price_range),
        thumbnail_url: non_blank(raw.thumbnail_url),
        place_type: raw.place_type,
        types: Some(raw.types.unwrap_or_default()),
        rating_count: raw.rating_count,
        grid_lat: raw.grid_lat,
        grid_lng: raw.grid_lng,
        fid: non_blank(raw.fid),
    })
}

pub fn load_records(path: &Path) -> Result<Vec<RawPlace>, SeedError> {
    let text = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Refuses to touch a non-empty store unless `replace` is set, in which case
/// every place is deleted first.
pub fn prepare_store(conn: &Connection, replace: bool) -> Result<(), SeedError> {
    let existing = places::count(conn)?;
    if existing == 0 {
        return Ok(());
    }
    if !replace {
        return Err(SeedError::NotEmpty(existing));
    }
    let removed = places::delete_all(conn)?;
    info!("Cleared {removed} existing places");
    Ok(())
}

pub fn seed(conn: &mut Connection, records: Vec<RawPlace>, batch_size: usize) -> SeedSummary {
    let mut summary = SeedSummary::default();
    let batch_size = batch_size.max(1);
    let batches = records.len().div_ceil(batch_size);

    let mut records = records.into_iter().enumerate().peekable();
    let mut batch_number = 0;
    while records.peek().is_some() {
        batch_number += 1;
        let batch: Vec<(usize, RawPlace)> = records.by_ref().take(batch_size).collect();
        let first_index = batch.first().map_or(0, |(index, _)| *index);

        let mut ready = Vec::with_capacity(batch.len());
        for (_, raw) in batch {
            match transform(raw) {
                Some(place) => ready.push(place),
                None => summary.skipped += 1,
            }
        }

        match insert_batch(conn, &ready) {
            Ok((imported, duplicates)) => {
                summary.imported += imported;
                summary.skipped += duplicates;
                info!("Batch {batch_number}/{batches}: {imported} imported, {duplicates} duplicates");
            }
            Err(err) => {
                error!("Batch {batch_number}/{batches} starting at record {first_index} failed: {err}");
                summary.errors.push(SeedFailure {
                    index: first_index,
                    error: err.to_string(),
                });
            }
        }
    }

    summary
}

/// Inserts one batch in a transaction. Unique-key collisions are counted and
/// skipped; any other failure rolls the batch back.
fn insert_batch(conn: &mut Connection, batch: &[NewPlace]) -> Result<(usize, usize), StoreError> {
    let tx = conn.transaction()?;
    let now = Utc::now();
    let mut imported = 0;
    let mut duplicates = 0;
    for place in batch {
        match places::insert(&tx, place, now) {
            Ok(_) => imported += 1,
            Err(StoreError::Constraint(_)) => duplicates += 1,
            Err(err) => return Err(err),
        }
    }
    tx.commit()?;
    Ok((imported, duplicates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory;
    use crate::db::places::{all, count, insert, sample};
    use serde_json::json;

    fn raw(value: Value) -> RawPlace {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn transform_fills_defaults_and_maps_fields() {
        let place = transform(raw(json!({
            "title": "Hotel Africa",
            "address": "Avenue Habib Bourguiba",
            "latitude": 36.8,
            "longitude": 10.18,
            "ratingCount": 250,
            "type": "Hotel",
            "cid": "123",
            "openingHours": ["08:00-20:00", "Closed"],
            "grid_lat": 36.0,
            "grid_lng": 10.0
        })))
        .unwrap();

        assert_eq!(place.category, "Hotel");
        assert_eq!(place.governorate, UNSPECIFIED);
        assert_eq!(place.reviews, 250);
        assert_eq!(place.place_id.as_deref(), Some("123"));
        assert_eq!(
            place.opening_hours,
            Some(json!({"day0": "08:00-20:00", "day1": "Closed"}))
        );
        assert_eq!(place.grid_lat, Some(36.0));
        assert_eq!(place.types, Some(Vec::new()));
    }

    #[test]
    fn transform_skips_incomplete_records() {
        assert!(transform(raw(json!({"title": "x", "address": "y", "latitude": 1.0}))).is_none());
        assert!(transform(raw(json!({"title": " ", "address": "y", "latitude": 1.0, "longitude": 2.0}))).is_none());
        assert!(transform(raw(json!({"title": "x", "address": "y", "latitude": 0.0, "longitude": 0.0}))).is_some());
    }

    #[test]
    fn seed_counts_imports_skips_and_duplicates() {
        let mut conn = memory();
        let records = vec![
            raw(json!({"title": "A", "address": "a", "latitude": 1.0, "longitude": 1.0, "placeId": "p1"})),
            raw(json!({"title": "B", "address": "b", "latitude": 1.0, "longitude": 1.0, "placeId": "p1"})),
            raw(json!({"title": "C"})),
            raw(json!({"title": "D", "address": "d", "latitude": 1.0, "longitude": 1.0})),
        ];

        let summary = seed(&mut conn, records, 2);
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 2);
        assert!(summary.errors.is_empty());
        assert_eq!(count(&conn).unwrap(), 2);
        let titles: Vec<_> = all(&conn).unwrap().into_iter().map(|p| p.title).collect();
        assert!(titles.contains(&"D".to_string()));
    }

    #[test]
    fn non_empty_store_needs_replace() {
        let conn = memory();
        insert(&conn, &sample("existing"), Utc::now()).unwrap();

        assert!(matches!(prepare_store(&conn, false), Err(SeedError::NotEmpty(1))));
        prepare_store(&conn, true).unwrap();
        assert_eq!(count(&conn).unwrap(), 0);
    }
}
