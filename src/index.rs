//! The dataset index: one row per annotation file, persisted as CSV.

use jwalk::WalkDir;
use log::{debug, info};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::annotation::read_annotation;
use crate::error::{IoContext, Result};
use crate::types::{AnnotationRecord, IndexRow, IMAGE_EXTENSION};

/// Ordered, read-only collection of annotation records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetIndex {
    records: Vec<AnnotationRecord>,
}

impl DatasetIndex {
    pub fn new(records: Vec<AnnotationRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct class labels, sorted.
    pub fn class_labels(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.class_label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Write the index as CSV with a leading unnamed row-number column.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        let file = File::create(path).with_path(path)?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        for (index, record) in self.records.iter().enumerate() {
            writer.serialize(IndexRow::new(index, record))?;
        }
        writer.flush().with_path(path)?;
        Ok(())
    }

    /// Read an index previously written by [`DatasetIndex::write_csv`].
    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let records = reader
            .deserialize::<IndexRow>()
            .map(|row| row.map(AnnotationRecord::from))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("Read {} index rows from {}", records.len(), path.display());
        Ok(Self { records })
    }
}

/// Build the index from per-class image and annotation directories.
///
/// Every file in `<annot_dir>/<class>/` yields one record. Its image is
/// expected at `<img_dir>/<class>/<annotation file name>.jpg`; when that file
/// does not exist the record's `img_uri` is empty. The class label is the one
/// declared inside the annotation, not the directory name.
pub fn build_index(img_dir: &Path, annot_dir: &Path) -> Result<DatasetIndex> {
    let mut records = Vec::new();

    for (class_dir, annotation_path) in annotation_files(annot_dir)? {
        let file_name = annotation_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let img_path = img_dir
            .join(&class_dir)
            .join(format!("{}.{}", file_name, IMAGE_EXTENSION));
        let img_uri = if img_path.exists() {
            img_path.to_string_lossy().into_owned()
        } else {
            debug!("No image for annotation {}", annotation_path.display());
            String::new()
        };

        let record = read_annotation(&annotation_path, &img_uri)?;
        if !class_dir.contains(record.class_label.as_str()) {
            debug!(
                "Annotation {} declares class {:?} inside directory {:?}",
                annotation_path.display(),
                record.class_label,
                class_dir
            );
        }
        records.push(record);
    }

    info!("Indexed {} annotation files.", records.len());
    Ok(DatasetIndex::new(records))
}

// (class directory name, annotation file) pairs, sorted by path
fn annotation_files(annot_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(annot_dir)
        .skip_hidden(true)
        .sort(true)
        .min_depth(2)
        .max_depth(2)
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let class_dir = entry
            .parent_path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push((class_dir, entry.path()));
    }
    Ok(files)
}

/// Build the index and persist it to `output_csv` in one step.
pub fn create_img_db(img_dir: &Path, annot_dir: &Path, output_csv: &Path) -> Result<DatasetIndex> {
    let index = build_index(img_dir, annot_dir)?;
    index.write_csv(output_csv)?;
    info!("Wrote index to {}", output_csv.display());
    Ok(index)
}
