//! Resolves a row's requested operation against the store.

use super::row::{Operation, RequestedOperation};
use crate::db::{places, StoreError};
use rusqlite::Connection;
use std::collections::HashSet;

/// Answers "is this `place_id` already stored?".
pub trait PlaceIdLookup {
    fn contains_place_id(&self, place_id: &str) -> Result<bool, StoreError>;
}

/// One point read per question.
impl PlaceIdLookup for Connection {
    fn contains_place_id(&self, place_id: &str) -> Result<bool, StoreError> {
        places::exists_by_place_id(self, place_id)
    }
}

/// The stored subset of an import's place ids, read once up front.
#[derive(Debug, Clone, Default)]
pub struct KnownPlaceIds(HashSet<String>);

impl KnownPlaceIds {
    pub fn prefetch(conn: &Connection, mut candidates: Vec<String>) -> Result<Self, StoreError> {
        candidates.sort_unstable();
        candidates.dedup();
        Ok(KnownPlaceIds(places::existing_place_ids(conn, &candidates)?))
    }
}

impl PlaceIdLookup for KnownPlaceIds {
    fn contains_place_id(&self, place_id: &str) -> Result<bool, StoreError> {
        Ok(self.0.contains(place_id))
    }
}

/// Explicit operations pass through. `Auto` becomes `Update` when the row's
/// `place_id` is stored and `Add` otherwise, including when it has no id.
pub fn classify(
    requested: RequestedOperation,
    place_id: Option<&str>,
    lookup: &impl PlaceIdLookup,
) -> Result<Operation, StoreError> {
    let operation = match requested {
        RequestedOperation::Add => Operation::Add,
        RequestedOperation::Update => Operation::Update,
        RequestedOperation::Delete => Operation::Delete,
        RequestedOperation::Auto => match place_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) if lookup.contains_place_id(id)? => Operation::Update,
            _ => Operation::Add,
        },
    };
    Ok(operation)
}
