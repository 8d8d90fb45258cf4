use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::Error;

// Identifier written by the annotation tool when it failed to fill the filename
pub const PLACEHOLDER_ID: &str = "%s";

pub const IMAGE_EXTENSION: &str = "jpg";
pub const DEFAULT_LABEL_FORMAT: &str = "txt";

/// One annotated object, parsed from a single annotation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub id: String,
    pub class_label: String,
    pub width: i64,
    pub height: i64,
    pub depth: i64,
    pub bb_xmin: i64,
    pub bb_ymin: i64,
    pub bb_xmax: i64,
    pub bb_ymax: i64,
    /// Resolved image path, empty when no image was found.
    pub img_uri: String,
}

impl AnnotationRecord {
    pub fn image_path(&self) -> Option<&Path> {
        if self.img_uri.is_empty() {
            None
        } else {
            Some(Path::new(&self.img_uri))
        }
    }
}

// A CSV row of the index: the record plus its leading row number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct IndexRow {
    #[serde(rename = "")]
    pub index: usize,
    #[serde(rename = "ID")]
    pub id: String,
    pub class_label: String,
    pub width: i64,
    pub height: i64,
    pub depth: i64,
    pub bb_xmin: i64,
    pub bb_ymin: i64,
    pub bb_xmax: i64,
    pub bb_ymax: i64,
    pub img_uri: String,
}

impl IndexRow {
    pub fn new(index: usize, record: &AnnotationRecord) -> Self {
        Self {
            index,
            id: record.id.clone(),
            class_label: record.class_label.clone(),
            width: record.width,
            height: record.height,
            depth: record.depth,
            bb_xmin: record.bb_xmin,
            bb_ymin: record.bb_ymin,
            bb_xmax: record.bb_xmax,
            bb_ymax: record.bb_ymax,
            img_uri: record.img_uri.clone(),
        }
    }
}

impl From<IndexRow> for AnnotationRecord {
    fn from(row: IndexRow) -> Self {
        Self {
            id: row.id,
            class_label: row.class_label,
            width: row.width,
            height: row.height,
            depth: row.depth,
            bb_xmin: row.bb_xmin,
            bb_ymin: row.bb_ymin,
            bb_xmax: row.bb_xmax,
            bb_ymax: row.bb_ymax,
            img_uri: row.img_uri,
        }
    }
}

/// Dataset partition a record is exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "val" => Ok(Split::Val),
            "test" => Ok(Split::Test),
            _ => Err(Error::UnknownSplit(s.to_string())),
        }
    }
}
