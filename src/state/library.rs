use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::data::{CatalogItem, NewItem};
use crate::error::StoreError;

type StoreResult<T> = Result<T, StoreError>;

const ITEM_COLUMNS: &str = "id, filename, type, dominant_color, pattern, season, formality, notes";

/// The Catalog manages the SQLite wardrobe database.
/// It stores one row per garment image together with its inferred attributes.
pub struct Catalog {
    conn: Connection,
    db_path: PathBuf,
}

impl Catalog {
    /// Open the catalog at `db_path`, creating the parent directory, the
    /// database file and the schema as needed.
    ///
    /// Safe to call on an already-initialized catalog.
    pub fn initialize(db_path: impl AsRef<Path>) -> StoreResult<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::StorageInitIo {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(&db_path).map_err(|source| StoreError::StorageInit {
            path: db_path.clone(),
            source,
        })?;

        let catalog = Catalog { conn, db_path };
        catalog.init_schema()?;

        info!(path = %catalog.db_path.display(), "catalog initialized");
        Ok(catalog)
    }

    /// Open a private catalog that lives only as long as this value
    pub fn open_in_memory() -> StoreResult<Self> {
        let db_path = PathBuf::from(":memory:");
        let conn = Connection::open_in_memory().map_err(|source| StoreError::StorageInit {
            path: db_path.clone(),
            source,
        })?;

        let catalog = Catalog { conn, db_path };
        catalog.init_schema()?;
        Ok(catalog)
    }

    /// Creates the items table and its indexes if they don't exist.
    fn init_schema(&self) -> StoreResult<()> {
        // AUTOINCREMENT keeps ids from being reused after deletes by other tools
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS items (
                    id              INTEGER PRIMARY KEY AUTOINCREMENT,
                    filename        TEXT NOT NULL,
                    type            TEXT NOT NULL DEFAULT 'unknown',
                    dominant_color  TEXT,
                    pattern         TEXT,
                    season          TEXT,
                    formality       INTEGER,
                    notes           TEXT
                );
                CREATE INDEX IF NOT EXISTS idx_items_filename ON items(filename);",
            )
            .map_err(|source| StoreError::StorageInit {
                path: self.db_path.clone(),
                source,
            })
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Insert a new item and return its assigned id.
    ///
    /// Field semantics are not checked here; the ingestion pipeline does that.
    pub fn insert(&self, item: &NewItem) -> StoreResult<i64> {
        self.conn
            .execute(
                "INSERT INTO items (filename, type, dominant_color, pattern, season, formality, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    item.filename,
                    item.item_type,
                    item.dominant_color,
                    item.pattern,
                    item.season,
                    item.formality,
                    item.notes,
                ],
            )
            .map_err(StoreError::StorageWrite)?;

        let id = self.conn.last_insert_rowid();
        debug!(id, filename = %item.filename, "inserted catalog item");
        Ok(id)
    }

    /// Up to `limit` most recently inserted items, newest first
    pub fn list(&self, limit: usize) -> StoreResult<Vec<CatalogItem>> {
        if limit == 0 {
            return Err(StoreError::InvalidLimit);
        }
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {ITEM_COLUMNS} FROM items ORDER BY id DESC LIMIT ?1"
            ))
            .map_err(StoreError::StorageRead)?;

        let rows = stmt
            .query_map([limit], |row| {
                Ok(CatalogItem {
                    id: row.get(0)?,
                    filename: row.get(1)?,
                    item_type: row.get(2)?,
                    dominant_color: row.get(3)?,
                    pattern: row.get(4)?,
                    season: row.get(5)?,
                    formality: row.get(6)?,
                    notes: row.get(7)?,
                })
            })
            .map_err(StoreError::StorageRead)?;

        let mut items = Vec::new();
        for item in rows {
            items.push(item.map_err(StoreError::StorageRead)?);
        }

        Ok(items)
    }

    /// Get a count of items in the catalog
    pub fn count(&self) -> StoreResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
            .map_err(StoreError::StorageRead)
    }

    /// Whether any item already references `filename`
    pub fn contains_filename(&self, filename: &str) -> StoreResult<bool> {
        self.conn
            .query_row(
                "SELECT 1 FROM items WHERE filename = ?1 LIMIT 1",
                [filename],
                |_| Ok(()),
            )
            .optional()
            .map(|found| found.is_some())
            .map_err(StoreError::StorageRead)
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::ItemType;

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let catalog = Catalog::open_in_memory().unwrap();
        let a = catalog.insert(&NewItem::new("a.png", ItemType::Top)).unwrap();
        let b = catalog.insert(&NewItem::new("b.png", ItemType::Bottom)).unwrap();
        assert!(b > a);
        assert_eq!(catalog.count().unwrap(), 2);
    }

    #[test]
    fn test_list_is_newest_first_and_limited() {
        let catalog = Catalog::open_in_memory().unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            catalog.insert(&NewItem::new(name, ItemType::Top)).unwrap();
        }

        let items = catalog.list(2).unwrap();
        let names: Vec<_> = items.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, ["c.png", "b.png"]);
        assert!(items[0].id > items[1].id);
    }

    #[test]
    fn test_list_rejects_zero_limit() {
        let catalog = Catalog::open_in_memory().unwrap();
        assert!(matches!(catalog.list(0), Err(StoreError::InvalidLimit)));
    }

    #[test]
    fn test_optional_fields_round_trip() {
        let catalog = Catalog::open_in_memory().unwrap();
        let mut item = NewItem::new("coat.jpg", ItemType::Outerwear).with_color("rgb(10,20,30)");
        item.formality = Some(4);
        item.season = Some("winter".into());
        let id = catalog.insert(&item).unwrap();

        let stored = catalog.list(1).unwrap().remove(0);
        assert_eq!(stored, item.into_item(id));
    }

    #[test]
    fn test_foreign_type_label_reads_as_unknown() {
        let catalog = Catalog::open_in_memory().unwrap();
        catalog
            .conn
            .execute("INSERT INTO items (filename, type) VALUES ('x.png', 'dress')", [])
            .unwrap();
        assert_eq!(catalog.list(1).unwrap()[0].item_type, ItemType::Unknown);
    }

    #[test]
    fn test_contains_filename() {
        let catalog = Catalog::open_in_memory().unwrap();
        catalog.insert(&NewItem::new("tee.png", ItemType::Top)).unwrap();
        assert!(catalog.contains_filename("tee.png").unwrap());
        assert!(!catalog.contains_filename("jeans.png").unwrap());
    }

    #[test]
    fn test_initialize_is_idempotent_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("metadata").join("wardrobe.db");

        let first = Catalog::initialize(&path).unwrap();
        first.insert(&NewItem::new("a.png", ItemType::Top)).unwrap();
        drop(first);

        let second = Catalog::initialize(&path).unwrap();
        assert_eq!(second.count().unwrap(), 1);
        assert_eq!(second.path(), path.as_path());
    }

    #[test]
    fn test_initialize_fails_on_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let result = Catalog::initialize(blocker.join("wardrobe.db"));
        assert!(matches!(result, Err(StoreError::StorageInitIo { .. })));
    }
}
