use std::io::Read;
use std::path::Path;

use crate::error::TableError;

/// A header row plus data rows, all cells kept as text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read comma-separated text with a header row.
    /// Short rows are accepted; missing trailing cells read as null.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.iter().map(str::to_string).collect();
        let rows = rdr
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column named exactly `name`
    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(move |(index, cells)| Row {
            table: self,
            index,
            cells,
        })
    }
}

/// Borrowed view of one data row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Zero-based position among the data rows
    pub fn index(&self) -> usize {
        self.index
    }

    /// Trimmed cell under `column`. Blank cells and absent columns are None.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.table.column(column)?;
        self.cells
            .get(idx)
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
    }

    /// First non-null value among `aliases`, in alias order
    pub fn first_of(&self, aliases: &[&str]) -> Option<&'a str> {
        aliases.iter().find_map(|alias| self.get(alias))
    }
}

/// Lower-case and trim every header. Columns are neither renamed nor merged.
pub fn normalize_columns(table: Table) -> Table {
    let Table { headers, rows } = table;
    let headers = headers
        .into_iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    Table { headers, rows }
}

/// Load a tag table from disk and normalize its headers
pub fn load_tags_csv(path: &Path) -> Result<Table, TableError> {
    if !path.exists() {
        return Err(TableError::NotFound(path.to_path_buf()));
    }

    let file = std::fs::File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(normalize_columns(Table::from_reader(file)?))
}
