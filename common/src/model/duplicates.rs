use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lightweight projection of a group member, enough for a confirmation UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatePlace {
    pub id: String,
    pub place_id: Option<String>,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Places sharing one `cid`, with the record to keep and the ones to remove.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub cid: String,
    pub count: usize,
    pub keep_id: String,
    pub remove_ids: Vec<String>,
    /// Members in creation order.
    pub places: Vec<DuplicatePlace>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateReport {
    pub total_duplicate_groups: usize,
    /// What a confirming UI shows as "will delete N records".
    pub total_places_to_remove: usize,
    pub groups: Vec<DuplicateGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveDuplicatesResponse {
    pub success: bool,
    pub deleted_count: usize,
}
