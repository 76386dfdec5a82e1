use serde::{Deserialize, Serialize};

/// Per-row failure reported back to the operator.
///
/// `row` is the spreadsheet row number (the header is row 1), so the operator
/// can fix the file and resubmit only the failed lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub skipped: usize,
}

impl ImportStats {
    pub fn processed(&self) -> usize {
        self.created + self.updated + self.deleted + self.skipped
    }
}

/// Outcome of a spreadsheet import.
///
/// Partial success is normal: valid rows are applied even when others fail, and
/// every failure shows up in `errors` (validation failures first, in row order,
/// then store failures in processing order).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub success: bool,
    pub stats: ImportStats,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    pub fn skip(&mut self, row: usize, error: impl Into<String>) {
        self.stats.skipped += 1;
        self.errors.push(RowError {
            row,
            error: error.into(),
        });
    }

    /// Folds the outcome of one committed batch into the running totals.
    pub fn absorb(&mut self, other: ImportReport) {
        self.stats.created += other.stats.created;
        self.stats.updated += other.stats.updated;
        self.stats.deleted += other.stats.deleted;
        self.stats.skipped += other.stats.skipped;
        self.errors.extend(other.errors);
    }
}
