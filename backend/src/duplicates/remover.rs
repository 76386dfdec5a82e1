use super::DuplicateError;
use crate::db::{places, StoreError};
use rusqlite::Connection;
use std::collections::HashSet;

/// Deletes the given store ids in one transaction and returns how many records
/// actually went away. Ids that no longer exist are not an error.
///
/// The ids are trusted as-is: nothing checks that they still belong to a
/// duplicate group.
pub fn remove_duplicates(conn: &mut Connection, ids: Vec<String>) -> Result<usize, DuplicateError> {
    if ids.is_empty() {
        return Err(DuplicateError::NoIds);
    }

    let mut seen = HashSet::with_capacity(ids.len());
    let unique: Vec<String> = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();

    let tx = conn.transaction().map_err(StoreError::from)?;
    let removed = places::delete_many(&tx, &unique)?;
    tx.commit().map_err(StoreError::from)?;
    Ok(removed)
}
