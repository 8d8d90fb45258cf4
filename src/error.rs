use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while indexing annotations or exporting the YOLO dataset.
///
/// Nothing is recovered: the first error aborts the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk directory: {0}")]
    Walk(#[from] jwalk::Error),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("annotation {} has no <{tag}> tag", path.display())]
    MissingTag { path: PathBuf, tag: &'static str },
    #[error("annotation {} has non-integer <{tag}> value {value:?}", path.display())]
    InvalidInteger {
        path: PathBuf,
        tag: &'static str,
        value: String,
    },
    #[error("archive {} contains unsafe entry path {}", archive.display(), entry.display())]
    UnsafeArchivePath { archive: PathBuf, entry: PathBuf },
    #[error("record {id:?} has no image location")]
    MissingImage { id: String },
    #[error("record {id:?} has zero image width or height")]
    ZeroImageSize { id: String },
    #[error("unknown split {0:?}, expected train, val or test")]
    UnknownSplit(String),
    #[error("record {id:?} has label {label:?} which is not in the class list")]
    UnknownClass { id: String, label: String },
    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attach a path to an `io::Error`.
pub(crate) trait IoContext<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
