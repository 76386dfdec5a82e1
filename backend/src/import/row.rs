//! Typed view of one spreadsheet line.

use super::sheet::{Sheet, SheetRow};
use crate::validation::{Numeric, PlaceFields};
use std::fmt;

/// What the `_operation` column asked for. Blank means `Auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedOperation {
    Add,
    Update,
    Delete,
    Auto,
}

impl RequestedOperation {
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(RequestedOperation::Auto);
        };
        match raw.to_uppercase().as_str() {
            "ADD" => Ok(RequestedOperation::Add),
            "UPDATE" => Ok(RequestedOperation::Update),
            "DELETE" => Ok(RequestedOperation::Delete),
            "AUTO" => Ok(RequestedOperation::Auto),
            _ => Err("_operation must be one of: ADD, UPDATE, DELETE, AUTO".to_string()),
        }
    }
}

/// The store mutation a row resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Add => "ADD",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    PlaceId,
    Cid,
    Title,
    Category,
    Governorate,
    Address,
    Latitude,
    Longitude,
    Rating,
    Reviews,
    Position,
    PhoneNumber,
    Website,
    ThumbnailUrl,
    PriceRange,
    Operation,
}

impl Column {
    fn from_header(name: &str) -> Option<Self> {
        let column = match name.trim().to_ascii_lowercase().as_str() {
            "placeid" => Column::PlaceId,
            "cid" => Column::Cid,
            "title" => Column::Title,
            "category" => Column::Category,
            "governorate" => Column::Governorate,
            "address" => Column::Address,
            "latitude" => Column::Latitude,
            "longitude" => Column::Longitude,
            "rating" => Column::Rating,
            "reviews" => Column::Reviews,
            "position" => Column::Position,
            "phonenumber" => Column::PhoneNumber,
            "website" => Column::Website,
            "thumbnailurl" => Column::ThumbnailUrl,
            "pricerange" => Column::PriceRange,
            "_operation" => Column::Operation,
            _ => return None,
        };
        Some(column)
    }
}

/// A parsed row before validation. `errors` holds problems found while
/// coercing the raw cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub number: usize,
    pub requested: RequestedOperation,
    pub fields: PlaceFields,
    pub errors: Vec<String>,
}

/// Header position → column, first occurrence wins for repeated headers.
struct ColumnMap(Vec<Option<Column>>);

impl ColumnMap {
    fn new(headers: &[String]) -> Self {
        let mut seen = Vec::new();
        let columns = headers
            .iter()
            .map(|header| {
                let column = Column::from_header(header)?;
                if seen.contains(&column) {
                    return None;
                }
                seen.push(column);
                Some(column)
            })
            .collect();
        ColumnMap(columns)
    }

    fn parse(&self, row: &SheetRow) -> ImportRow {
        let mut fields = PlaceFields::default();
        let mut operation = None;

        for (column, cell) in self.0.iter().zip(row.cells.iter()) {
            let (Some(column), Some(value)) = (column, cell) else {
                continue;
            };
            let value = value.clone();
            match column {
                Column::PlaceId => fields.place_id = Some(value),
                Column::Cid => fields.cid = Some(value),
                Column::Title => fields.title = Some(value),
                Column::Category => fields.category = Some(value),
                Column::Governorate => fields.governorate = Some(value),
                Column::Address => fields.address = Some(value),
                Column::Latitude => fields.latitude = Numeric::parse(Some(&value)),
                Column::Longitude => fields.longitude = Numeric::parse(Some(&value)),
                Column::Rating => fields.rating = Numeric::parse(Some(&value)),
                Column::Reviews => fields.reviews = Numeric::parse(Some(&value)),
                Column::Position => fields.position = Numeric::parse(Some(&value)),
                Column::PhoneNumber => fields.phone_number = Some(value),
                Column::Website => fields.website = Some(value),
                Column::ThumbnailUrl => fields.thumbnail_url = Some(value),
                Column::PriceRange => fields.price_range = Some(value),
                Column::Operation => operation = Some(value),
            }
        }

        let mut errors = Vec::new();
        let requested = RequestedOperation::parse(operation.as_deref()).unwrap_or_else(|e| {
            errors.push(e);
            RequestedOperation::Auto
        });

        ImportRow {
            number: row.number,
            requested,
            fields,
            errors,
        }
    }
}

pub fn parse_rows(sheet: &Sheet) -> Vec<ImportRow> {
    let columns = ColumnMap::new(&sheet.headers);
    sheet.rows.iter().map(|row| columns.parse(row)).collect()
}
