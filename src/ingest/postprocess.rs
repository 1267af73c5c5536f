/// Classifier output → tag table
///
/// Turns a table of `image,labels` rows produced by an external image
/// classifier into the `filename,type,dominant_color,...` layout that
/// `sync` consumes.

use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use super::table::load_tags_csv;
use crate::error::TableError;
use crate::vision::dominant::extract_dominant_color;
use crate::vision::tagger::{parse_labels, to_coarse_type};

const OUTPUT_HEADER: [&str; 6] = [
    "filename",
    "type",
    "dominant_color",
    "pattern",
    "season",
    "formality",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PostprocessReport {
    pub rows: usize,
    /// Rows whose image was not found locally while colors were requested
    pub missing_images: usize,
}

pub fn postprocess(
    in_csv: &Path,
    out_csv: &Path,
    images_dir: &Path,
    compute_color: bool,
) -> Result<PostprocessReport, TableError> {
    let table = load_tags_csv(in_csv)?;
    for column in ["image", "labels"] {
        if !table.has_column(column) {
            return Err(TableError::MissingColumn(column.to_string()));
        }
    }

    if let Some(parent) = out_csv.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| TableError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut writer = csv::Writer::from_path(out_csv)?;
    writer.write_record(OUTPUT_HEADER)?;

    let mut report = PostprocessReport::default();
    for row in table.rows() {
        // Keep the basename only; the classifier ran on another machine
        let filename = row
            .get("image")
            .and_then(|image| Path::new(image).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let labels = row.get("labels").map(parse_labels).unwrap_or_default();
        let item_type = to_coarse_type(&labels);

        let local_path = images_dir.join(&filename);
        let mut dominant_color = String::new();
        if compute_color {
            if !filename.is_empty() && local_path.is_file() {
                match extract_dominant_color(&local_path) {
                    Ok(color) => dominant_color = color.to_string(),
                    Err(err) => warn!(file = %filename, %err, "color skipped"),
                }
            } else {
                report.missing_images += 1;
            }
        }

        writer.write_record([
            filename.as_str(),
            item_type.as_str(),
            dominant_color.as_str(),
            "",
            "",
            "",
        ])?;
        report.rows += 1;
    }

    writer.flush().map_err(|source| TableError::Io {
        path: out_csv.to_path_buf(),
        source,
    })?;

    info!(
        out = %out_csv.display(),
        rows = report.rows,
        missing_images = report.missing_images,
        "wrote cleaned tags"
    );
    Ok(report)
}
