/// Normalized tag rows
///
/// Every alias lookup happens here, once per row. The validator and the
/// row mapper both consume `TagRow` instead of probing table columns.

use tracing::warn;

use super::table::Row;
use crate::state::data::{ItemType, NewItem};
use crate::vision::Rgb;

pub const FILENAME_ALIASES: &[&str] = &["filename", "image_name", "file"];
pub const TYPE_ALIASES: &[&str] = &["type", "predicted_type"];
pub const COLOR_ALIASES: &[&str] = &["dominant_color", "color"];

pub const FORMALITY_MIN: i64 = 0;
pub const FORMALITY_MAX: i64 = 5;

/// One input row with aliases resolved; values are still unvalidated text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagRow {
    pub index: usize,
    pub filename: Option<String>,
    pub type_label: Option<String>,
    pub color: Option<String>,
    pub pattern: Option<String>,
    pub season: Option<String>,
    pub formality: Option<String>,
    pub notes: Option<String>,
}

impl TagRow {
    pub fn from_row(row: &Row<'_>) -> Self {
        let owned = |value: Option<&str>| value.map(str::to_string);
        Self {
            index: row.index(),
            filename: owned(row.first_of(FILENAME_ALIASES)),
            type_label: owned(row.first_of(TYPE_ALIASES)),
            color: owned(row.first_of(COLOR_ALIASES)),
            pattern: owned(row.get("pattern")),
            season: owned(row.get("season")),
            formality: owned(row.get("formality")),
            notes: owned(row.get("notes")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormalityError {
    NotInteger,
    OutOfRange(i64),
}

/// Parse a formality cell. Integral floats such as `3.0` are accepted.
pub fn parse_formality(text: &str) -> Result<i64, FormalityError> {
    let text = text.trim();
    let value = match text.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let float = text.parse::<f64>().map_err(|_| FormalityError::NotInteger)?;
            if !float.is_finite() || float.fract() != 0.0 || float.abs() > i64::MAX as f64 {
                return Err(FormalityError::NotInteger);
            }
            float as i64
        }
    };

    if (FORMALITY_MIN..=FORMALITY_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(FormalityError::OutOfRange(value))
    }
}

/// Map a normalized row to insertable fields.
///
/// Returns None when the row has no usable filename. Invalid colors and
/// formality values become null; the validator reports them separately.
pub fn map_row_to_record(row: &TagRow) -> Option<NewItem> {
    let filename = row.filename.clone()?;

    let item_type = row
        .type_label
        .as_deref()
        .map(ItemType::from_label)
        .unwrap_or_default();

    let dominant_color = row.color.as_deref().and_then(|text| match text.parse::<Rgb>() {
        Ok(color) => Some(color.to_string()),
        Err(err) => {
            warn!(row = row.index, color = text, %err, "dropping malformed color");
            None
        }
    });

    let formality = row
        .formality
        .as_deref()
        .and_then(|text| parse_formality(text).ok());

    Some(NewItem {
        filename,
        item_type,
        dominant_color,
        pattern: row.pattern.clone(),
        season: row.season.clone(),
        formality,
        notes: row.notes.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::table::{normalize_columns, Table};

    fn first_row(csv: &str) -> TagRow {
        let table = normalize_columns(Table::from_reader(csv.as_bytes()).unwrap());
        let row = table.rows().next().unwrap();
        TagRow::from_row(&row)
    }

    #[test]
    fn test_aliases_resolve_in_order() {
        let row = first_row("image_name,predicted_type,color,type\nshirt.png,bottom,\"rgb(1,2,3)\",top\n");
        assert_eq!(row.filename.as_deref(), Some("shirt.png"));
        assert_eq!(row.type_label.as_deref(), Some("top"));
        assert_eq!(row.color.as_deref(), Some("rgb(1,2,3)"));
    }

    #[test]
    fn test_map_full_row() {
        let row = first_row(
            "filename,type,dominant_color,pattern,season,formality\n\
             coat.jpg,Outerwear,\"rgb( 10, 20, 30 )\",plaid,winter,4\n",
        );
        let item = map_row_to_record(&row).unwrap();
        assert_eq!(item.filename, "coat.jpg");
        assert_eq!(item.item_type, ItemType::Outerwear);
        assert_eq!(item.dominant_color.as_deref(), Some("rgb(10,20,30)"));
        assert_eq!(item.pattern.as_deref(), Some("plaid"));
        assert_eq!(item.season.as_deref(), Some("winter"));
        assert_eq!(item.formality, Some(4));
    }

    #[test]
    fn test_map_skips_rows_without_filename() {
        let row = first_row("filename,type\n,top\n");
        assert_eq!(map_row_to_record(&row), None);
    }

    #[test]
    fn test_map_nulls_invalid_values() {
        let row = first_row("file,type,color,formality\nx.png,dress,blue,very formal\n");
        let item = map_row_to_record(&row).unwrap();
        assert_eq!(item.item_type, ItemType::Unknown);
        assert_eq!(item.dominant_color, None);
        assert_eq!(item.formality, None);
    }

    #[test]
    fn test_parse_formality() {
        assert_eq!(parse_formality("3"), Ok(3));
        assert_eq!(parse_formality(" 5.0 "), Ok(5));
        assert_eq!(parse_formality("0"), Ok(0));
        assert_eq!(parse_formality("6"), Err(FormalityError::OutOfRange(6)));
        assert_eq!(parse_formality("-1"), Err(FormalityError::OutOfRange(-1)));
        assert_eq!(parse_formality("2.5"), Err(FormalityError::NotInteger));
        assert_eq!(parse_formality("casual"), Err(FormalityError::NotInteger));
        assert_eq!(parse_formality("NaN"), Err(FormalityError::NotInteger));
    }
}
