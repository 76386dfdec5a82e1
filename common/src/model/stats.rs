use serde::{Deserialize, Serialize};

/// Aggregate view over the whole directory, served by `GET /api/places/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total: usize,
    pub categories: Vec<Breakdown>,
    pub governorates: Vec<Breakdown>,
    pub rating_distribution: Vec<RatingBucket>,
    pub contact_info: ContactInfo,
    pub aggregates: Aggregates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
}

/// Places whose rating rounds to `rating` (half-star buckets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingBucket {
    pub rating: f64,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub with_phone: usize,
    pub with_website: usize,
    pub with_both: usize,
    pub percentage_with_phone: f64,
    pub percentage_with_website: f64,
    pub percentage_with_both: f64,
}

/// Min/max/average only consider strictly positive ratings and review counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub average_rating: f64,
    pub average_reviews: i64,
    pub max_rating: f64,
    pub min_rating: f64,
    pub max_reviews: i64,
    pub min_reviews: i64,
    pub top_rated_count: usize,
    pub top_rated_percentage: f64,
    pub highly_reviewed_count: usize,
    pub highly_reviewed_percentage: f64,
}
