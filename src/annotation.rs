//! Field extraction from per-object annotation files.
//!
//! Annotation files are read as plain text. Each field of interest lives in a
//! `<tag>value</tag>` pair; only the first occurrence of a tag is used, so a
//! file always yields exactly one record.

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{Error, IoContext, Result};
use crate::types::{AnnotationRecord, PLACEHOLDER_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

/// A tag read from every annotation file and how its value is parsed.
#[derive(Debug, Clone, Copy)]
pub struct TagField {
    pub tag: &'static str,
    pub kind: FieldKind,
}

// Order matches the index columns
pub const ANNOTATION_SCHEMA: [TagField; 9] = [
    TagField { tag: "filename", kind: FieldKind::Text },
    TagField { tag: "name", kind: FieldKind::Text },
    TagField { tag: "width", kind: FieldKind::Integer },
    TagField { tag: "height", kind: FieldKind::Integer },
    TagField { tag: "depth", kind: FieldKind::Integer },
    TagField { tag: "xmin", kind: FieldKind::Integer },
    TagField { tag: "ymin", kind: FieldKind::Integer },
    TagField { tag: "xmax", kind: FieldKind::Integer },
    TagField { tag: "ymax", kind: FieldKind::Integer },
];

static TAG_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn tag_patterns() -> &'static [Regex] {
    TAG_PATTERNS.get_or_init(|| {
        ANNOTATION_SCHEMA
            .iter()
            .map(|field| {
                let tag = regex::escape(field.tag);
                Regex::new(&format!(r"(?s)<{tag}>(.*?)</{tag}>"))
                    .expect("annotation tag pattern is valid")
            })
            .collect()
    })
}

// Text of the first `<tag>...</tag>` pair matched by `pattern`
fn first_match<'a>(pattern: &Regex, content: &'a str) -> Option<&'a str> {
    pattern
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse the content of one annotation file into a record.
///
/// `path` is only used for error messages. `img_uri` is the resolved image
/// location (empty when the image does not exist); when the file's
/// `<filename>` is the `%s` placeholder the id is taken from its stem.
pub fn parse_annotation(path: &Path, content: &str, img_uri: &str) -> Result<AnnotationRecord> {
    let mut text = [""; ANNOTATION_SCHEMA.len()];
    let mut integers = [0i64; ANNOTATION_SCHEMA.len()];

    for (i, (field, pattern)) in ANNOTATION_SCHEMA.iter().zip(tag_patterns()).enumerate() {
        let raw = first_match(pattern, content).ok_or_else(|| Error::MissingTag {
            path: path.to_path_buf(),
            tag: field.tag,
        })?;
        match field.kind {
            FieldKind::Text => text[i] = raw,
            FieldKind::Integer => {
                integers[i] = raw.trim().parse().map_err(|_| Error::InvalidInteger {
                    path: path.to_path_buf(),
                    tag: field.tag,
                    value: raw.to_string(),
                })?;
            }
        }
    }

    let mut id = text[0].to_string();
    if id == PLACEHOLDER_ID {
        id = image_stem(img_uri);
    }

    Ok(AnnotationRecord {
        id,
        class_label: text[1].to_string(),
        width: integers[2],
        height: integers[3],
        depth: integers[4],
        bb_xmin: integers[5],
        bb_ymin: integers[6],
        bb_xmax: integers[7],
        bb_ymax: integers[8],
        img_uri: img_uri.to_string(),
    })
}

/// Read and parse one annotation file.
pub fn read_annotation(path: &Path, img_uri: &str) -> Result<AnnotationRecord> {
    let content = fs::read_to_string(path).with_path(path)?;
    parse_annotation(path, &content, img_uri)
}

fn image_stem(img_uri: &str) -> String {
    Path::new(img_uri)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
