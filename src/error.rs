/// Error types for the wardrobe catalog
///
/// Each component owns its own error enum so callers can decide how far a
/// failure should propagate (a bad image skips one item, a broken catalog
/// aborts the whole operation).

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the catalog store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Parent directory could not be created
    #[error("failed to create catalog directory {}: {source}", .path.display())]
    StorageInitIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Database could not be opened or the schema could not be applied
    #[error("failed to initialize catalog at {}: {source}", .path.display())]
    StorageInit {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// An insert did not persist
    #[error("failed to write catalog item: {0}")]
    StorageWrite(#[source] rusqlite::Error),

    /// A query failed
    #[error("failed to read catalog: {0}")]
    StorageRead(#[source] rusqlite::Error),

    /// `list` was called with a limit of zero
    #[error("list limit must be a positive integer")]
    InvalidLimit,
}

/// Errors raised while deriving attributes from an image
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("failed to open image {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image has no pixels")]
    EmptyImage,
}

/// Errors raised while reading or writing tag tables
#[derive(Error, Debug)]
pub enum TableError {
    #[error("could not find CSV at: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV must contain a '{0}' column")]
    MissingColumn(String),
}

/// Errors raised by the outfit matcher
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecommendationError {
    /// A stored color could not be parsed; indicates corrupted catalog data
    #[error("item {item_id} has malformed color '{value}'")]
    MalformedColor { item_id: i64, value: String },
}

/// Errors raised while adding a single image to the catalog
#[derive(Error, Debug)]
pub enum AddError {
    #[error("{} has no file name", .0.display())]
    InvalidName(PathBuf),

    #[error("failed to copy {} into {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
