use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering::Relaxed};

use crate::classes::ClassEncoding;
use crate::error::{Error, IoContext, Result};
use crate::images::{copy_image, CopyOutcome};
use crate::index::DatasetIndex;
use crate::labels::write_label;
use crate::split::SplitAssignment;
use crate::types::{AnnotationRecord, Split, DEFAULT_LABEL_FORMAT};
use crate::utils::{create_io_thread_pool, create_progress_bar};

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Extension of the label files
    pub label_format: String,
    /// Size of the copy pool, 0 for one thread per core
    pub workers: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
            workers: 0,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportStats {
    pub labels_written: usize,
    pub images_copied: usize,
    pub images_skipped: usize,
    pub unassigned_records: usize,
}

impl ExportStats {
    pub fn log_summary(&self) {
        info!("=== Export Summary ===");
        info!("Label files written: {}", self.labels_written);
        info!("Images copied: {}", self.images_copied);
        info!("Images already present: {}", self.images_skipped);
        if self.unassigned_records > 0 {
            warn!(
                "Records without a split assignment: {}",
                self.unassigned_records
            );
        }
    }
}

fn split_title(split: Split) -> &'static str {
    match split {
        Split::Train => "Train",
        Split::Val => "Val",
        Split::Test => "Test",
    }
}

/// Write the label file and copy the image of every assigned record.
///
/// Records are grouped by split and each group is processed on a bounded
/// pool. The first failing record aborts the export.
pub fn export_dataset(
    index: &DatasetIndex,
    assignment: &SplitAssignment,
    classes: &ClassEncoding,
    dest_root: &Path,
    options: &ExportOptions,
) -> Result<ExportStats> {
    let mut by_split: BTreeMap<Split, Vec<(&AnnotationRecord, usize)>> = BTreeMap::new();
    let mut unassigned_records = 0;

    for record in index.records() {
        let Some(split) = assignment.get(&record.id) else {
            debug!("Record {:?} has no split, skipping", record.id);
            unassigned_records += 1;
            continue;
        };
        let class_id = classes
            .encode(&record.class_label)
            .ok_or_else(|| Error::UnknownClass {
                id: record.id.clone(),
                label: record.class_label.clone(),
            })?;
        by_split.entry(split).or_default().push((record, class_id));
    }

    let pool = create_io_thread_pool(options.workers)?;
    let labels_written = AtomicUsize::new(0);
    let images_copied = AtomicUsize::new(0);
    let images_skipped = AtomicUsize::new(0);

    for (split, rows) in &by_split {
        let split = *split;
        let pb = create_progress_bar(rows.len() as u64, split_title(split));
        pool.install(|| {
            rows.par_iter().try_for_each(|(record, class_id)| -> Result<()> {
                write_label(record, *class_id, dest_root, split, &options.label_format)?;
                labels_written.fetch_add(1, Relaxed);
                match copy_image(record, dest_root, split)? {
                    CopyOutcome::Copied => images_copied.fetch_add(1, Relaxed),
                    CopyOutcome::Skipped => images_skipped.fetch_add(1, Relaxed),
                };
                pb.inc(1);
                Ok(())
            })
        })?;
        pb.finish_with_message(format!("{} processing complete", split_title(split)));
    }

    Ok(ExportStats {
        labels_written: labels_written.into_inner(),
        images_copied: images_copied.into_inner(),
        images_skipped: images_skipped.into_inner(),
        unassigned_records,
    })
}

/// Create the dataset.yaml file for YOLO training
pub fn create_dataset_yaml(dest_root: &Path, classes: &ClassEncoding, has_test: bool) -> Result<()> {
    fs::create_dir_all(dest_root).with_path(dest_root)?;
    let dataset_yaml_path = dest_root.join("dataset.yaml");
    let absolute_path = fs::canonicalize(dest_root).with_path(dest_root)?;

    let mut yaml_content = format!(
        "path: {}\ntrain: images/train\nval: images/val\n",
        absolute_path.to_string_lossy()
    );
    if has_test {
        yaml_content.push_str("test: images/test\n");
    } else {
        yaml_content.push_str("test:\n");
    }
    yaml_content.push_str("\nnames:\n");
    for (id, label) in classes.names().iter().enumerate() {
        yaml_content.push_str(&format!("    {}: {}\n", id, label));
    }

    let mut dataset_yaml = BufWriter::new(File::create(&dataset_yaml_path).with_path(&dataset_yaml_path)?);
    dataset_yaml
        .write_all(yaml_content.as_bytes())
        .and_then(|_| dataset_yaml.flush())
        .with_path(&dataset_yaml_path)
}
