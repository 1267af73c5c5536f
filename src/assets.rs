/// Image asset lookup
///
/// Catalog filenames are loose references. Files get renamed between
/// `.jpg` and `.jpeg`, or re-exported as `.png`, so lookup falls back from
/// the literal name to any file sharing the same stem. A missing asset is
/// reported as `None` and never fails the caller.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as garment images (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Whether `path` has one of the supported image extensions
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Find the file backing `filename` inside `images_dir`
pub fn resolve_image(images_dir: &Path, filename: &str) -> Option<PathBuf> {
    let literal = images_dir.join(filename);
    if literal.is_file() {
        return Some(literal);
    }

    for ext in IMAGE_EXTENSIONS {
        let candidate = literal.with_extension(ext);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    // Any file in the same directory with the same stem
    let stem = literal.file_stem()?.to_os_string();
    let dir = literal.parent()?;
    WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .find(|p| p.file_stem() == Some(OsStr::new(&stem)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_name_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tee.png"), b"x").unwrap();
        std::fs::write(dir.path().join("tee.jpg"), b"x").unwrap();

        assert_eq!(resolve_image(dir.path(), "tee.png"), Some(dir.path().join("tee.png")));
    }

    #[test]
    fn test_alternate_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("coat.jpeg"), b"x").unwrap();

        assert_eq!(resolve_image(dir.path(), "coat.jpg"), Some(dir.path().join("coat.jpeg")));
    }

    #[test]
    fn test_stem_match_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("boots.webp"), b"x").unwrap();

        assert_eq!(resolve_image(dir.path(), "boots.png"), Some(dir.path().join("boots.webp")));
    }

    #[test]
    fn test_missing_asset_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_image(dir.path(), "ghost.png"), None);
        assert_eq!(resolve_image(Path::new("/nonexistent/images"), "ghost.png"), None);
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a/B.JPG")));
        assert!(is_image_file(Path::new("c.png")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("README")));
    }
}
