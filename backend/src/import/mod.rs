//! Bulk spreadsheet import.
//!
//! The pipeline is: read the sheet ([`sheet`]), coerce each line into typed
//! fields ([`row`]), validate every row in parallel, classify the valid rows
//! against a prefetched set of stored `placeId`s ([`classify`]) and finally
//! apply them in transactional batches ([`executor`]).

pub mod classify;
pub mod executor;
pub mod row;
pub mod sheet;

use crate::db::StoreError;
use classify::{classify, KnownPlaceIds};
use common::model::import::ImportReport;
use executor::{execute, ExecuteOptions, Planned, PlannedRow};
use log::info;
use rayon::prelude::*;
use row::{parse_rows, ImportRow};
use rusqlite::Connection;
use sheet::{Sheet, SheetError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(
        "Import timed out before batch {batch}; {} rows were committed",
        .committed.stats.processed()
    )]
    DeadlineExceeded { batch: usize, committed: ImportReport },

    #[error("Import batch {batch} was rolled back: {source}")]
    BatchAborted {
        batch: usize,
        #[source]
        source: StoreError,
        committed: ImportReport,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validates a parsed row. Coercion errors come first, then the rule
/// violations.
fn check(row: ImportRow) -> (ImportRow, Option<Vec<String>>) {
    let verdict = crate::validation::validate(&row.fields);
    if row.errors.is_empty() && verdict.is_valid() {
        return (row, None);
    }
    let mut errors = row.errors.clone();
    errors.extend(verdict.errors);
    (row, Some(errors))
}

pub fn import_sheet(
    conn: &mut Connection,
    sheet: &Sheet,
    options: &ExecuteOptions,
) -> Result<ImportReport, ImportError> {
    let checked: Vec<(ImportRow, Option<Vec<String>>)> =
        parse_rows(sheet).into_par_iter().map(check).collect();

    let candidates = checked
        .iter()
        .filter(|(_, errors)| errors.is_none())
        .filter_map(|(row, _)| row.fields.place_id.as_deref())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    let known = KnownPlaceIds::prefetch(conn, candidates)?;

    let mut planned = Vec::with_capacity(checked.len());
    for (row, errors) in checked {
        let action = match errors {
            Some(errors) => Planned::Invalid(errors),
            None => {
                let operation =
                    classify(row.requested, row.fields.place_id.as_deref(), &known)?;
                match row.fields.into_new_place() {
                    Ok(place) => Planned::Apply { operation, place },
                    Err(verdict) => Planned::Invalid(verdict.errors),
                }
            }
        };
        planned.push(PlannedRow {
            number: row.number,
            action,
        });
    }

    let report = execute(conn, planned, options)?;
    info!(
        "Import finished: {} created, {} updated, {} deleted, {} skipped",
        report.stats.created, report.stats.updated, report.stats.deleted, report.stats.skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory;
    use crate::db::places::{all, insert, sample};
    use chrono::Utc;
    use sheet::read_sheet;

    const HEADER: &str = "placeId,title,category,governorate,address,latitude,longitude,_operation";

    fn run(conn: &mut Connection, csv: &str) -> ImportReport {
        let sheet = read_sheet("places.csv", csv.as_bytes().to_vec()).unwrap();
        import_sheet(conn, &sheet, &ExecuteOptions::default()).unwrap()
    }

    #[test]
    fn mixed_sheet_reports_partial_success() {
        let mut conn = memory();
        let csv = format!(
            "{HEADER}\n\
             ,Café Sidi Chabaane,Café,Tunis,Sidi Bou Said,36.87,10.34,\n\
             ,Bad Lat,Café,Tunis,Somewhere,200,10.0,\n\
             ghost,Gone,Café,Tunis,Somewhere,36.0,10.0,DELETE\n"
        );

        let report = run(&mut conn, &csv);
        assert!(report.success);
        assert_eq!(report.stats.created, 1);
        assert_eq!(report.stats.updated, 0);
        assert_eq!(report.stats.deleted, 0);
        assert_eq!(report.stats.skipped, 2);
        let rows: Vec<_> = report.errors.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![3, 4]);
        assert_eq!(report.errors[0].error, "latitude must be between -90 and 90");
    }

    #[test]
    fn auto_rows_update_known_place_ids_and_add_new_ones() {
        let mut conn = memory();
        let mut stored = sample("Old title");
        stored.place_id = Some("p-1".into());
        insert(&conn, &stored, Utc::now()).unwrap();

        let csv = format!(
            "{HEADER}\n\
             p-1,New title,Café,Tunis,Avenue,36.8,10.1,\n\
             p-2,Fresh,Restaurant,Sfax,Route,34.7,10.7,auto\n"
        );
        let report = run(&mut conn, &csv);
        assert_eq!(report.stats.updated, 1);
        assert_eq!(report.stats.created, 1);

        let titles: Vec<_> = all(&conn).unwrap().into_iter().map(|p| p.title).collect();
        assert!(titles.contains(&"New title".to_string()));
        assert!(titles.contains(&"Fresh".to_string()));
    }

    #[test]
    fn operation_errors_are_listed_before_field_errors() {
        let mut conn = memory();
        let csv = format!("{HEADER}\n,,Café,Tunis,Avenue,36.8,10.1,MERGE\n");
        let report = run(&mut conn, &csv);
        assert_eq!(report.stats.skipped, 1);
        assert_eq!(
            report.errors[0].error,
            "_operation must be one of: ADD, UPDATE, DELETE, AUTO, title is required"
        );
    }

    #[test]
    fn counts_always_cover_every_row() {
        let mut conn = memory();
        let mut csv = format!("{HEADER}\n");
        for i in 0..25 {
            let lat = if i % 5 == 0 { "95" } else { "36.5" };
            csv.push_str(&format!("id-{i},Place {i},Hotel,Nabeul,Road {i},{lat},10.7,\n"));
        }
        let sheet = read_sheet("places.csv", csv.into_bytes()).unwrap();
        let options = ExecuteOptions {
            batch_size: 4,
            deadline: None,
        };
        let report = import_sheet(&mut conn, &sheet, &options).unwrap();
        assert_eq!(report.stats.processed(), 25);
        assert_eq!(report.stats.created, 20);
        assert_eq!(report.stats.skipped, 5);
    }
}
