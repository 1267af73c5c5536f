//! Wardrobe catalog and outfit suggestions.
//!
//! Garment images are cataloged in SQLite together with a dominant color
//! (k-means over the pixels) and a coarse type (keyword lookup on the file
//! name). Tag tables exported by other tools can be validated and synced
//! into the same catalog. The recommender pairs tops with bottoms under a
//! color-clash rule and a cool-weather rule.

pub mod assets;
pub mod config;
pub mod error;
pub mod ingest;
pub mod recommend;
pub mod state;
pub mod vision;

pub use config::Config;
pub use state::data::{CatalogItem, ItemType, NewItem};
pub use state::library::Catalog;
