/// Ingestion pipeline
///
/// This module moves externally produced data into the catalog:
/// - CSV loading and header normalization (table.rs)
/// - Alias resolution and row mapping (record.rs)
/// - Advisory row validation (validate.rs)
/// - Table → catalog sync with a dedup policy (sync.rs)
/// - Single-image add and folder import (import.rs)
/// - Classifier label post-processing (postprocess.rs)

pub mod import;
pub mod postprocess;
pub mod record;
pub mod sync;
pub mod table;
pub mod validate;

pub use import::{add_image, import_folder, ImportResult};
pub use record::{map_row_to_record, TagRow};
pub use sync::{load_and_sync, sync, DedupPolicy, SyncReport};
pub use table::{load_tags_csv, normalize_columns, Table};
pub use validate::{validate, IssueKind, ValidationIssue};
