//! Duplicate detection by `cid` and confirmed bulk removal.

mod grouper;
mod remover;

pub use grouper::{group_duplicates, KeepMostReviewed, KeepOldest, KeepPolicy};
pub use remover::remove_duplicates;

use crate::db::{places, StoreError};
use common::model::duplicates::DuplicateReport;
use rusqlite::Connection;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuplicateError {
    #[error("idsToDelete must be a non-empty array")]
    NoIds,

    #[error("keep must be one of: oldest, most_reviewed (got '{0}')")]
    UnknownPolicy(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Named keep policies, as written in configuration and in `?keep=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepPolicyKind {
    #[default]
    Oldest,
    MostReviewed,
}

impl KeepPolicyKind {
    pub fn parse(raw: &str) -> Result<Self, DuplicateError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "oldest" => Ok(KeepPolicyKind::Oldest),
            "most_reviewed" => Ok(KeepPolicyKind::MostReviewed),
            _ => Err(DuplicateError::UnknownPolicy(raw.to_string())),
        }
    }

    pub fn policy(self) -> &'static dyn KeepPolicy {
        match self {
            KeepPolicyKind::Oldest => &KeepOldest,
            KeepPolicyKind::MostReviewed => &KeepMostReviewed,
        }
    }
}

pub fn find_duplicates(
    conn: &Connection,
    policy: &dyn KeepPolicy,
) -> Result<DuplicateReport, DuplicateError> {
    let candidates = places::duplicate_candidates(conn)?;
    Ok(group_duplicates(candidates, policy))
}
