//! VOC-style annotation to YOLO dataset converter
//!
//! This library indexes per-class annotation files into a CSV table and turns
//! the indexed records into a YOLO training layout: `labels/<split>/<id>.txt`
//! holding normalized boxes and `images/<split>/<id>.jpg`.

pub mod annotation;
pub mod archive;
pub mod classes;
pub mod config;
pub mod dataset;
pub mod error;
pub mod images;
pub mod index;
pub mod labels;
pub mod regroup;
pub mod split;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use annotation::{parse_annotation, read_annotation};
pub use archive::extract_archive;
pub use classes::ClassEncoding;
pub use dataset::{create_dataset_yaml, export_dataset, ExportOptions, ExportStats};
pub use error::{Error, Result};
pub use images::{copy_image, CopyOutcome};
pub use index::{build_index, create_img_db, DatasetIndex};
pub use labels::{write_label, NormalizedBox};
pub use regroup::copy_into_class_folders;
pub use split::SplitAssignment;
pub use types::{AnnotationRecord, Split};
