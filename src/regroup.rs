//! Copy images from flat per-breed source folders into `<dir>/<class>/`.
//!
//! Source folders are named `<prefix>-<class>` (for example
//! `n02085620-Chihuahua`); the class is the part after the last hyphen.

use log::info;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::images::copy_if_absent;

/// Destination of `source` below `dir`, or `None` if the path has no parent folder.
pub fn class_folder_destination(source: &Path, dir: &Path) -> Option<PathBuf> {
    let file_name = source.file_name()?;
    let folder = source.parent()?.file_name()?.to_str()?;
    let class = folder.rsplit('-').next().unwrap_or(folder);
    Some(dir.join(class).join(file_name))
}

/// Copy every source image into its class folder, skipping existing files.
///
/// Returns the number of processed images, copied or skipped.
pub fn copy_into_class_folders<I, P>(sources: I, dir: &Path) -> Result<usize>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut processed = 0;
    for source in sources {
        let source = source.as_ref();
        let dest = class_folder_destination(source, dir)
            .ok_or_else(|| Error::InvalidPath(source.to_path_buf()))?;
        copy_if_absent(source, &dest)?;
        processed += 1;
    }
    info!("{} images processed", processed);
    Ok(processed)
}
