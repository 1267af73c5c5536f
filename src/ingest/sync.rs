/// Tag table → catalog synchronization
///
/// Each row is mapped and inserted on its own. A failing row is recorded in
/// the report and the remaining rows are still processed.

use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use super::record::{map_row_to_record, TagRow};
use super::table::{load_tags_csv, Table};
use crate::error::{StoreError, TableError};
use crate::state::library::Catalog;

/// What to do with a row whose filename is already cataloged.
///
/// Source rows carry no natural key, so re-running a sync with
/// `AlwaysInsert` produces duplicate records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    #[default]
    AlwaysInsert,
    SkipExistingFilename,
}

/// Outcome of a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Rows that became catalog items
    pub inserted: usize,
    /// Rows without a usable filename
    pub skipped_no_filename: usize,
    /// Rows skipped by `DedupPolicy::SkipExistingFilename`
    pub skipped_duplicate: usize,
    /// Row index and error text for rows the store rejected
    pub failures: Vec<(usize, String)>,
}

fn sync_row(
    catalog: &Catalog,
    row: &TagRow,
    policy: DedupPolicy,
    report: &mut SyncReport,
) -> Result<(), StoreError> {
    let Some(item) = map_row_to_record(row) else {
        report.skipped_no_filename += 1;
        return Ok(());
    };

    if policy == DedupPolicy::SkipExistingFilename && catalog.contains_filename(&item.filename)? {
        report.skipped_duplicate += 1;
        return Ok(());
    }

    catalog.insert(&item)?;
    report.inserted += 1;
    Ok(())
}

/// Insert every usable row of a normalized table.
/// `SyncReport::inserted` counts the successful inserts.
pub fn sync(catalog: &Catalog, table: &Table, policy: DedupPolicy) -> SyncReport {
    let mut report = SyncReport::default();

    for row in table.rows() {
        let tag_row = TagRow::from_row(&row);
        if let Err(err) = sync_row(catalog, &tag_row, policy, &mut report) {
            warn!(row = tag_row.index, %err, "row not inserted");
            report.failures.push((tag_row.index, err.to_string()));
        }
    }

    info!(
        inserted = report.inserted,
        skipped_no_filename = report.skipped_no_filename,
        skipped_duplicate = report.skipped_duplicate,
        failed = report.failures.len(),
        "sync complete"
    );
    report
}

/// Load the CSV at `csv_path` and sync it into `catalog`
pub fn load_and_sync(
    catalog: &Catalog,
    csv_path: &Path,
    policy: DedupPolicy,
) -> Result<SyncReport, TableError> {
    let table = load_tags_csv(csv_path)?;
    Ok(sync(catalog, &table, policy))
}
