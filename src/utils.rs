use indicatif::{ProgressBar, ProgressStyle};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .progress_chars("#>-"),
    );
    pb
}

/// Build a pool for file copies; 0 workers lets rayon pick one per core
pub fn create_io_thread_pool(workers: usize) -> Result<ThreadPool> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("voc2yolo-io-{}", i))
        .build()?;
    Ok(pool)
}

/// Use a record id as an output file stem.
///
/// Ids that would be altered by filename sanitizing (path separators, `.`/`..`,
/// characters illegal on common filesystems) are rejected rather than rewritten,
/// so two ids can never share an output file.
pub fn checked_file_stem(id: &str) -> Result<&str> {
    if id.is_empty() || !sanitize_filename::is_sanitized(id) {
        return Err(Error::InvalidPath(PathBuf::from(id)));
    }
    Ok(id)
}
