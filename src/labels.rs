use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, IoContext, Result};
use crate::types::{AnnotationRecord, Split};
use crate::utils::checked_file_stem;

/// A bounding box as YOLO expects it: center and size relative to the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedBox {
    /// Convert the record's absolute corner coordinates.
    pub fn from_record(record: &AnnotationRecord) -> Result<Self> {
        if record.width == 0 || record.height == 0 {
            return Err(Error::ZeroImageSize {
                id: record.id.clone(),
            });
        }
        let img_w = record.width as f64;
        let img_h = record.height as f64;

        // f64 before subtracting, any pair of i64 corners is valid input
        let w = record.bb_xmax as f64 - record.bb_xmin as f64;
        let h = record.bb_ymax as f64 - record.bb_ymin as f64;
        let x_center = record.bb_xmin as f64 + w / 2.0;
        let y_center = record.bb_ymin as f64 + h / 2.0;

        Ok(Self {
            x_center: x_center / img_w,
            y_center: y_center / img_h,
            width: w / img_w,
            height: h / img_h,
        })
    }

    /// `class x_center y_center width height`, numbers in shortest round-trip form.
    pub fn to_label_line(&self, class_id: usize) -> String {
        format!(
            "{} {:?} {:?} {:?} {:?}",
            class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// Path of the label file for `id` inside `<dest_root>/labels/<split>/`.
pub fn label_path(dest_root: &Path, split: Split, id: &str, format: &str) -> Result<PathBuf> {
    let stem = checked_file_stem(id)?;
    Ok(dest_root
        .join("labels")
        .join(split.as_str())
        .join(format!("{}.{}", stem, format)))
}

/// Write the record's label file, replacing any existing one.
pub fn write_label(
    record: &AnnotationRecord,
    class_id: usize,
    dest_root: &Path,
    split: Split,
    format: &str,
) -> Result<PathBuf> {
    let normalized = NormalizedBox::from_record(record)?;
    let output_path = label_path(dest_root, split, &record.id, format)?;
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }
    fs::write(&output_path, normalized.to_label_line(class_id)).with_path(&output_path)?;
    Ok(output_path)
}
