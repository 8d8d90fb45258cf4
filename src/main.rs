use clap::Parser;
use glob::glob;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use voc2yolo::config::{Args, Command, ExportArgs};
use voc2yolo::{
    copy_into_class_folders, create_dataset_yaml, create_img_db, export_dataset, extract_archive,
    ClassEncoding, DatasetIndex, ExportOptions, Split, SplitAssignment,
};

fn run_export(args: &ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let index = DatasetIndex::read_csv(&args.index_csv)?;
    info!("Read {} records from {}.", index.len(), args.index_csv.display());

    let assignment = match &args.split_file {
        Some(path) => SplitAssignment::load_csv(path)?,
        None => SplitAssignment::random(&index, args.val_size, args.test_size, args.seed),
    };
    if let Some(path) = &args.write_splits {
        assignment.write_csv(path)?;
    }

    let classes = if args.label_list.is_empty() {
        ClassEncoding::from_index(&index)
    } else {
        ClassEncoding::from_labels(args.label_list.iter().cloned())
    };
    info!("Using {} classes.", classes.len());

    let options = ExportOptions {
        label_format: args.label_format.clone(),
        workers: args.workers,
    };
    let stats = export_dataset(&index, &assignment, &classes, &args.output_dir, &options)?;
    stats.log_summary();

    info!("Creating dataset.yaml file...");
    let has_test = assignment.counts().contains_key(&Split::Test);
    create_dataset_yaml(&args.output_dir, &classes, has_test)?;
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Command::Extract {
            archive,
            output_dir,
        } => {
            extract_archive(&archive, &output_dir)?;
        }
        Command::Index {
            img_dir,
            annot_dir,
            output_csv,
        } => {
            create_img_db(&img_dir, &annot_dir, &output_csv)?;
        }
        Command::Export(export_args) => run_export(&export_args)?,
        Command::Regroup {
            pattern,
            output_dir,
        } => {
            let sources: Vec<PathBuf> = glob(&pattern)?.collect::<Result<_, _>>()?;
            copy_into_class_folders(sources, &output_dir)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => {
            info!("Done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
