use std::fmt;

use super::record::{parse_formality, FormalityError, TagRow, FORMALITY_MAX, FORMALITY_MIN};
use super::table::Table;
use crate::vision::Rgb;

/// What is wrong with a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    MissingFilename,
    BadColor(String),
    FormalityOutOfRange(i64),
    FormalityNotInteger(String),
}

/// Advisory problem found in one input row. Never blocks ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub row_index: usize,
    pub kind: IssueKind,
}

impl ValidationIssue {
    pub fn message(&self) -> String {
        match &self.kind {
            IssueKind::MissingFilename => "missing or invalid filename".to_string(),
            IssueKind::BadColor(color) => {
                format!("color '{color}' is not in rgb(R,G,B) format")
            }
            IssueKind::FormalityOutOfRange(value) => format!(
                "formality {value} out of expected range {FORMALITY_MIN}-{FORMALITY_MAX}"
            ),
            IssueKind::FormalityNotInteger(value) => {
                format!("formality '{value}' is not an integer")
            }
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row_index, self.message())
    }
}

/// Run every check against one row; checks do not short-circuit
pub fn check_row(row: &TagRow) -> Vec<ValidationIssue> {
    let mut kinds = Vec::new();

    if row.filename.is_none() {
        kinds.push(IssueKind::MissingFilename);
    }

    if let Some(color) = &row.color {
        if color.parse::<Rgb>().is_err() {
            kinds.push(IssueKind::BadColor(color.clone()));
        }
    }

    if let Some(formality) = &row.formality {
        match parse_formality(formality) {
            Ok(_) => {}
            Err(FormalityError::OutOfRange(value)) => {
                kinds.push(IssueKind::FormalityOutOfRange(value))
            }
            Err(FormalityError::NotInteger) => {
                kinds.push(IssueKind::FormalityNotInteger(formality.clone()))
            }
        }
    }

    kinds
        .into_iter()
        .map(|kind| ValidationIssue {
            row_index: row.index,
            kind,
        })
        .collect()
}

/// Check every row of a normalized table. An empty result means the data looks OK.
pub fn validate(table: &Table) -> Vec<ValidationIssue> {
    table
        .rows()
        .flat_map(|row| check_row(&TagRow::from_row(&row)))
        .collect()
}
