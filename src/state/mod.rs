/// State management module
///
/// This module handles the persisted wardrobe, including:
/// - Database connection and queries (library.rs)
/// - Shared data structures (data.rs)

pub mod data;
pub mod library;
