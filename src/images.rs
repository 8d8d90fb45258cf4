use log::debug;
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};

use crate::error::{Error, IoContext, Result};
use crate::types::{AnnotationRecord, Split, IMAGE_EXTENSION};
use crate::utils::checked_file_stem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// The destination already existed and was left untouched.
    Skipped,
}

/// Path of the image for `id` inside `<dest_root>/images/<split>/`.
pub fn image_path(dest_root: &Path, split: Split, id: &str) -> Result<PathBuf> {
    let stem = checked_file_stem(id)?;
    Ok(dest_root
        .join("images")
        .join(split.as_str())
        .join(format!("{}.{}", stem, IMAGE_EXTENSION)))
}

/// Copy `source` to `dest` unless `dest` already exists.
///
/// Permissions and access/modification times are carried over. A copy whose
/// times cannot be set is removed again, so a later run retries it instead of
/// skipping it.
pub fn copy_if_absent(source: &Path, dest: &Path) -> Result<CopyOutcome> {
    if dest.exists() {
        debug!("{} already exists, skipping copy", dest.display());
        return Ok(CopyOutcome::Skipped);
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }
    // fs::copy carries the permission bits
    fs::copy(source, dest).with_path(source)?;

    let metadata = fs::metadata(source).with_path(source)?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    // The copy may already be read-only; setting times only needs ownership
    if let Err(e) = File::open(dest).and_then(|file| file.set_times(times)) {
        let _ = fs::remove_file(dest);
        return Err(Error::Io {
            path: dest.to_path_buf(),
            source: e,
        });
    }

    Ok(CopyOutcome::Copied)
}

/// Copy the record's image into the split directory.
pub fn copy_image(record: &AnnotationRecord, dest_root: &Path, split: Split) -> Result<CopyOutcome> {
    let source = record.image_path().ok_or_else(|| Error::MissingImage {
        id: record.id.clone(),
    })?;
    copy_if_absent(source, &image_path(dest_root, split, &record.id)?)
}
