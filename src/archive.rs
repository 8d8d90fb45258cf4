use flate2::read::GzDecoder;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tar::Archive;

use crate::error::{Error, IoContext, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Returns true when the file starts with the gzip magic bytes
fn is_gzip(file: &mut File) -> std::io::Result<bool> {
    let mut magic = [0u8; 2];
    let n = file.read(&mut magic)?;
    file.seek(SeekFrom::Start(0))?;
    Ok(n == magic.len() && magic == GZIP_MAGIC)
}

/// Unpack a tar (optionally gzip-compressed) archive into `output_dir`.
///
/// The directory is created if needed. Entries keep the archive's own internal
/// layout below `output_dir`, not below the process working directory, so pass
/// the parent of the expected `Images/` or `Annotation/` tree. An entry that
/// would land outside `output_dir` aborts the extraction. Returns the number of
/// unpacked entries.
pub fn extract_archive(archive_path: &Path, output_dir: &Path) -> Result<usize> {
    fs::create_dir_all(output_dir).with_path(output_dir)?;

    let mut file = File::open(archive_path).with_path(archive_path)?;
    let reader: Box<dyn Read> = if is_gzip(&mut file).with_path(archive_path)? {
        debug!("{} is gzip-compressed", archive_path.display());
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let count = unpack_entries(Archive::new(reader), archive_path, output_dir)?;
    info!(
        "Extracted {} entries from {} into {}",
        count,
        archive_path.display(),
        output_dir.display()
    );
    Ok(count)
}

fn unpack_entries<R: Read>(
    mut archive: Archive<R>,
    archive_path: &Path,
    output_dir: &Path,
) -> Result<usize> {
    archive.set_preserve_mtime(true);
    let mut count = 0;
    for entry in archive.entries().with_path(archive_path)? {
        let mut entry = entry.with_path(archive_path)?;
        let entry_path = entry.path().with_path(archive_path)?.into_owned();
        let unpacked = entry.unpack_in(output_dir).with_path(output_dir.join(&entry_path))?;
        if !unpacked {
            return Err(Error::UnsafeArchivePath {
                archive: archive_path.to_path_buf(),
                entry: entry_path,
            });
        }
        count += 1;
    }
    Ok(count)
}
