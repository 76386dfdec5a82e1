use crate::model::place::Place;
use serde::{Deserialize, Serialize};

/// One page of `GET /api/places`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePage {
    pub places: Vec<Place>,
    /// Number of places matching the filters.
    pub total: i64,
    /// Number of places in the store, filters ignored.
    pub total_all: i64,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Pagination {
            page,
            limit,
            total,
            total_pages,
        }
    }
}
