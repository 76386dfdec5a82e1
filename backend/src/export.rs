//! Serialises places for download.
//!
//! The CSV layout uses the import column names, so an exported file can be
//! edited and uploaded again; the leading `id` column is ignored on import.

use common::model::place::Place;
use thiserror::Error;

pub const CSV_COLUMNS: [&str; 16] = [
    "id",
    "placeId",
    "cid",
    "title",
    "category",
    "governorate",
    "address",
    "latitude",
    "longitude",
    "rating",
    "reviews",
    "phoneNumber",
    "website",
    "thumbnailUrl",
    "priceRange",
    "position",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("format must be one of: csv, json (got '{0}')")]
    UnknownFormat(String),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(raw: Option<&str>) -> Result<Self, ExportError> {
        match raw.map(|f| f.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("csv") => Ok(ExportFormat::Csv),
            Some("json") => Ok(ExportFormat::Json),
            Some(other) => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "tunisia-places.csv",
            ExportFormat::Json => "tunisia-places.json",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn render(self, places: &[Place]) -> Result<Vec<u8>, ExportError> {
        match self {
            ExportFormat::Csv => to_csv(places),
            ExportFormat::Json => Ok(serde_json::to_vec_pretty(places)?),
        }
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

pub fn to_csv(places: &[Place]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_COLUMNS)?;

    for place in places {
        let latitude = place.latitude.to_string();
        let longitude = place.longitude.to_string();
        let rating = place.rating.to_string();
        let reviews = place.reviews.to_string();
        let position = place.position.to_string();
        writer.write_record([
            place.id.as_str(),
            opt(&place.place_id),
            opt(&place.cid),
            place.title.as_str(),
            place.category.as_str(),
            place.governorate.as_str(),
            place.address.as_str(),
            latitude.as_str(),
            longitude.as_str(),
            rating.as_str(),
            reviews.as_str(),
            opt(&place.phone_number),
            opt(&place.website),
            opt(&place.thumbnail_url),
            opt(&place.price_range),
            position.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory;
    use crate::db::places::{all, insert, sample};
    use crate::import::row::parse_rows;
    use crate::import::sheet::read_sheet;
    use chrono::Utc;

    fn stored() -> Vec<Place> {
        let conn = memory();
        let mut place = sample("Café, \"Le Central\"");
        place.place_id = Some("p-1".into());
        place.rating = 4.5;
        place.reviews = 12;
        place.website = Some("https://central.tn".into());
        insert(&conn, &place, Utc::now()).unwrap();
        all(&conn).unwrap()
    }

    #[test]
    fn format_defaults_to_csv() {
        assert_eq!(ExportFormat::parse(None).unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::parse(Some("JSON")).unwrap(), ExportFormat::Json);
        assert!(matches!(
            ExportFormat::parse(Some("xml")),
            Err(ExportError::UnknownFormat(_))
        ));
    }

    #[test]
    fn csv_export_can_be_imported_again() {
        let places = stored();
        let bytes = to_csv(&places).unwrap();

        let sheet = read_sheet("tunisia-places.csv", bytes).unwrap();
        assert_eq!(sheet.headers, CSV_COLUMNS.map(str::to_string).to_vec());

        let rows = parse_rows(&sheet);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields.title.as_deref(), Some("Café, \"Le Central\""));
        assert_eq!(rows[0].fields.place_id.as_deref(), Some("p-1"));
        assert_eq!(rows[0].fields.rating.value(), Some(4.5));
        assert!(crate::validation::validate(&rows[0].fields).is_valid());
    }

    #[test]
    fn json_export_holds_full_records() {
        let places = stored();
        let bytes = ExportFormat::Json.render(&places).unwrap();
        let parsed: Vec<Place> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, places);
    }
}
