/// Single-image add and folder import
///
/// Both paths derive attributes from the image itself: dominant color from
/// its pixels and coarse type from its file name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::sync::DedupPolicy;
use crate::assets::is_image_file;
use crate::error::AddError;
use crate::state::data::{CatalogItem, NewItem};
use crate::state::library::Catalog;
use crate::vision::{classify_type_from_name, extract_dominant_color};

/// Result of a folder import operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn same_content(a: &Path, b: &Path) -> io::Result<bool> {
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }
    Ok(fs::read(a)? == fs::read(b)?)
}

/// `name` with `-n` inserted before its extension
fn numbered_name(name: &str, n: usize) -> String {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{stem}-{n}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{n}"),
    }
}

/// Where an image lives inside the images directory
#[derive(Debug, Clone, PartialEq, Eq)]
struct Placement {
    /// Name stored in the catalog
    name: String,
    target: PathBuf,
    /// False when an identical file is already at `target`
    needs_copy: bool,
}

/// Pick the name `source` is stored under. Its own basename is used unless a
/// different file already holds it, in which case `stem-1.ext`, `stem-2.ext`
/// and so on are tried. An identical file already present is reused.
fn place_image(images_dir: &Path, source: &Path) -> Result<Placement, AddError> {
    let base = source
        .file_name()
        .ok_or_else(|| AddError::InvalidName(source.to_path_buf()))?
        .to_string_lossy()
        .into_owned();

    let mut name = base.clone();
    let mut n = 0;
    loop {
        let target = images_dir.join(&name);
        if same_file(source, &target) {
            return Ok(Placement { name, target, needs_copy: false });
        }
        if !target.exists() {
            return Ok(Placement { name, target, needs_copy: true });
        }
        let identical = same_content(source, &target).map_err(|err| AddError::Copy {
            from: source.to_path_buf(),
            to: target.clone(),
            source: err,
        })?;
        if identical {
            return Ok(Placement { name, target, needs_copy: false });
        }
        n += 1;
        name = numbered_name(&base, n);
    }
}

fn add_placed(
    catalog: &Catalog,
    images_dir: &Path,
    source: &Path,
    placement: Placement,
) -> Result<CatalogItem, AddError> {
    let Placement { name, target, needs_copy } = placement;

    if needs_copy {
        let copy_err = |source_err| AddError::Copy {
            from: source.to_path_buf(),
            to: target.clone(),
            source: source_err,
        };
        fs::create_dir_all(images_dir).map_err(copy_err)?;
        fs::copy(source, &target).map_err(copy_err)?;
        if Path::new(&name).file_name() != source.file_name() {
            info!(from = %source.display(), file = %name, "name taken, stored under a new name");
        }
    }

    let dominant_color = match extract_dominant_color(&target) {
        Ok(color) => Some(color.to_string()),
        Err(err) => {
            warn!(file = %name, %err, "color extraction failed");
            None
        }
    };

    let item_type = classify_type_from_name(&name);
    let mut item = NewItem::new(name, item_type);
    item.dominant_color = dominant_color;

    let id = catalog.insert(&item)?;
    info!(
        id,
        file = %item.filename,
        item_type = %item.item_type,
        color = item.dominant_color.as_deref().unwrap_or("none"),
        "added item"
    );
    Ok(item.into_item(id))
}

/// Store `source` under `images_dir` and catalog it.
///
/// A different image already holding the same name is never overwritten;
/// the new one gets a numbered name instead. An undecodable image is still
/// cataloged, just without a dominant color.
pub fn add_image(
    catalog: &Catalog,
    images_dir: &Path,
    source: &Path,
) -> Result<CatalogItem, AddError> {
    let placement = place_image(images_dir, source)?;
    add_placed(catalog, images_dir, source, placement)
}

/// Add every image found under `folder` (recursively).
///
/// With `SkipExistingFilename`, an image is skipped only when an identical
/// file is already stored under a cataloged name.
pub fn import_folder(
    catalog: &Catalog,
    images_dir: &Path,
    folder: &Path,
    policy: DedupPolicy,
) -> ImportResult {
    let mut result = ImportResult::default();

    info!(folder = %folder.display(), "scanning folder");

    for entry in WalkDir::new(folder)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || !is_image_file(path) {
            continue;
        }

        let placement = match place_image(images_dir, path) {
            Ok(placement) => placement,
            Err(err) => {
                warn!(file = %path.display(), %err, "import failed");
                result.failed += 1;
                continue;
            }
        };

        if policy == DedupPolicy::SkipExistingFilename && !placement.needs_copy {
            match catalog.contains_filename(&placement.name) {
                Ok(true) => {
                    debug!(file = %placement.name, "already cataloged");
                    result.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(err) => {
                    warn!(file = %placement.name, %err, "lookup failed");
                    result.failed += 1;
                    continue;
                }
            }
        }

        match add_placed(catalog, images_dir, path, placement) {
            Ok(_) => result.imported += 1,
            Err(err) => {
                warn!(file = %path.display(), %err, "import failed");
                result.failed += 1;
            }
        }
    }

    info!(
        imported = result.imported,
        skipped = result.skipped,
        failed = result.failed,
        "import complete"
    );
    result
}
