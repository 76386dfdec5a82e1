//! Applies classified rows to the store in fixed-size transactional batches.
//!
//! Invalid rows are reported before anything is written. Valid rows are then
//! committed batch by batch; inside a batch, row-level store failures (missing
//! key, unknown target, constraint violation) are recorded as skips and the
//! batch carries on, while any other store failure rolls the batch back and
//! ends the import.

use super::row::Operation;
use super::ImportError;
use crate::db::places::{self, NewPlace};
use crate::db::StoreError;
use chrono::Utc;
use common::model::import::ImportReport;
use log::debug;
use rusqlite::{Connection, Transaction};
use std::time::Instant;

/// One row after validation and classification.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRow {
    pub number: usize,
    pub action: Planned,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Planned {
    /// Failed validation; carries every violation in rule order.
    Invalid(Vec<String>),
    Apply { operation: Operation, place: NewPlace },
}

#[derive(Debug, Clone, Copy)]
pub struct ExecuteOptions {
    pub batch_size: usize,
    /// Checked before each batch starts.
    pub deadline: Option<Instant>,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        ExecuteOptions {
            batch_size: 100,
            deadline: None,
        }
    }
}

pub fn execute(
    conn: &mut Connection,
    rows: Vec<PlannedRow>,
    options: &ExecuteOptions,
) -> Result<ImportReport, ImportError> {
    let mut report = ImportReport::default();
    let mut valid = Vec::with_capacity(rows.len());

    for row in rows {
        match row.action {
            Planned::Invalid(errors) => report.skip(row.number, errors.join(", ")),
            Planned::Apply { operation, place } => valid.push((row.number, operation, place)),
        }
    }

    for (index, batch) in valid.chunks(options.batch_size.max(1)).enumerate() {
        let batch_number = index + 1;
        if options.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(ImportError::DeadlineExceeded {
                batch: batch_number,
                committed: report,
            });
        }

        let outcome = run_batch(conn, batch);
        match outcome {
            Ok(batch_report) => {
                debug!(
                    "Committed import batch {batch_number}: {} rows",
                    batch_report.stats.processed()
                );
                report.absorb(batch_report);
            }
            Err(source) => {
                return Err(ImportError::BatchAborted {
                    batch: batch_number,
                    source,
                    committed: report,
                });
            }
        }
    }

    report.success = true;
    Ok(report)
}

/// Runs one batch in its own transaction. The counters are only returned once
/// the commit succeeded; dropping the transaction on error rolls it back.
fn run_batch(
    conn: &mut Connection,
    batch: &[(usize, Operation, NewPlace)],
) -> Result<ImportReport, StoreError> {
    let tx = conn.transaction()?;
    let mut batch_report = ImportReport::default();

    for (number, operation, place) in batch {
        match apply(&tx, *operation, place) {
            Ok(()) => match operation {
                Operation::Add => batch_report.stats.created += 1,
                Operation::Update => batch_report.stats.updated += 1,
                Operation::Delete => batch_report.stats.deleted += 1,
            },
            Err(err) if err.is_row_level() => batch_report.skip(*number, err.to_string()),
            Err(err) => return Err(err),
        }
    }

    tx.commit()?;
    Ok(batch_report)
}

fn apply(tx: &Transaction<'_>, operation: Operation, place: &NewPlace) -> Result<(), StoreError> {
    let now = Utc::now();
    match operation {
        Operation::Add => places::insert(tx, place, now).map(|_| ()),
        Operation::Update => places::update_by_place_id(tx, required_key(operation, place)?, place, now),
        Operation::Delete => places::delete_by_place_id(tx, required_key(operation, place)?),
    }
}

fn required_key(operation: Operation, place: &NewPlace) -> Result<&str, StoreError> {
    place
        .place_id
        .as_deref()
        .ok_or_else(|| StoreError::NotFound(format!("placeId is required for {operation} operation")))
}
