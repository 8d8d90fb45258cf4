use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// Turn a per-class VOC-style annotated image dataset into a YOLO dataset.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Unpack a tar or tar.gz dataset archive
    Extract {
        /// Archive to unpack
        #[arg(short = 'a', long = "archive")]
        archive: PathBuf,

        /// Directory the archive is unpacked into
        #[arg(short = 'o', long = "output_dir", default_value = ".")]
        output_dir: PathBuf,
    },

    /// Index the annotation files into a CSV file
    Index {
        /// Directory with one image folder per class
        #[arg(short = 'i', long = "img_dir")]
        img_dir: PathBuf,

        /// Directory with one annotation folder per class
        #[arg(short = 'n', long = "annot_dir")]
        annot_dir: PathBuf,

        /// CSV file the index is written to
        #[arg(short = 'o', long = "output_csv")]
        output_csv: PathBuf,
    },

    /// Write YOLO label files and copy images into per-split folders
    Export(ExportArgs),

    /// Copy images into one folder per class
    Regroup {
        /// Glob pattern matching the source images
        #[arg(short = 'p', long = "pattern")]
        pattern: String,

        /// Directory receiving the class folders
        #[arg(short = 'o', long = "output_dir")]
        output_dir: PathBuf,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExportArgs {
    /// Index CSV produced by the index command
    #[arg(short = 'c', long = "index_csv")]
    pub index_csv: PathBuf,

    /// Root of the YOLO dataset
    #[arg(short = 'o', long = "output_dir")]
    pub output_dir: PathBuf,

    /// CSV file with ID,split columns; a seeded random split is used when absent
    #[arg(long = "split_file")]
    pub split_file: Option<PathBuf>,

    /// Proportion of the dataset to use for validation
    #[arg(long = "val_size", default_value_t = 0.2, value_parser = validate_size)]
    pub val_size: f32,

    /// Proportion of the dataset to use for testing
    #[arg(long = "test_size", default_value_t = 0.0, value_parser = validate_size)]
    pub test_size: f32,

    /// Seed for random shuffling
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// Save the split assignment used for the export to this CSV file
    #[arg(long = "write_splits")]
    pub write_splits: Option<PathBuf>,

    /// Extension of the label files
    #[arg(long = "label_format", default_value = "txt")]
    pub label_format: String,

    /// Number of copy workers, 0 for one per core
    #[arg(long = "workers", default_value_t = 0)]
    pub workers: usize,

    /// Ordered class list; defaults to the sorted labels of the index
    #[arg(value_delimiter = ',')]
    pub label_list: Vec<String>,
}

// Validate that the size is between 0.0 and 1.0
pub fn validate_size(s: &str) -> Result<f32, String> {
    match f32::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("SIZE must be between 0.0 and 1.0".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_size() {
        assert!(validate_size("0.5").is_ok());
        assert!(validate_size("1.0").is_ok());
        assert!(validate_size("0.0").is_ok());
        assert!(validate_size("-0.1").is_err());
        assert!(validate_size("1.1").is_err());
        assert!(validate_size("abc").is_err());
    }

    #[test]
    fn test_parse_export_args() {
        let args = Args::try_parse_from([
            "voc2yolo",
            "export",
            "--index_csv",
            "index.csv",
            "--output_dir",
            "yolo",
            "--test_size",
            "0.1",
            "pug,beagle",
        ])
        .unwrap();
        match args.command {
            Command::Export(export) => {
                assert_eq!(export.val_size, 0.2);
                assert_eq!(export.test_size, 0.1);
                assert_eq!(export.label_format, "txt");
                assert_eq!(export.label_list, vec!["pug", "beagle"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
