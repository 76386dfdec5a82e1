use serde::Deserialize;

/// Body of `DELETE /api/places/duplicates`.
///
/// `ids_to_delete` stays optional so that a missing field is reported with the
/// same message as an empty list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveDuplicatesRequest {
    pub ids_to_delete: Option<Vec<String>>,
}

/// Query string of `GET /api/places/duplicates`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DuplicatesQuery {
    /// `oldest` or `most_reviewed`; falls back to the configured policy.
    pub keep: Option<String>,
}

/// Query string accepted by the listing and export endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPlacesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    /// Comma-separated category names; `all` disables the filter.
    pub category: Option<String>,
    /// Comma-separated governorate names; `all` disables the filter.
    pub governorate: Option<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub min_reviews: Option<i64>,
    pub max_reviews: Option<i64>,
    pub has_phone: Option<bool>,
    pub has_website: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    /// Only read by the export endpoint: `csv` (default) or `json`.
    pub format: Option<String>,
}
