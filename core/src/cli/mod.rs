pub mod report;

use crate::types::HarvestConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for csharvest
#[derive(Parser, Debug)]
#[command(name = "csharvest")]
#[command(about = "Harvest coded-string values from multi-frame DICOM subjects into a CSV")]
#[command(version)]
pub struct Cli {
    /// Subject directories, each holding one directory per session
    #[arg(value_name = "SUBJECTS", required = true, num_args = 1..)]
    pub subjects: Vec<PathBuf>,

    /// CSV file listing the tags of interest in a `tag` column
    #[arg(long, value_name = "FILE")]
    pub part6_csv: PathBuf,

    /// CSV file the harvested rows are appended to
    #[arg(short, long, value_name = "FILE")]
    pub out_file: PathBuf,

    /// Keep enhanced frames as stored, without rebuilding legacy attributes
    #[arg(long)]
    pub no_reconstruct: bool,

    /// Visit directory entries in file-system order
    #[arg(long)]
    pub unsorted: bool,

    /// File extension a session contributes (repeatable)
    #[arg(short, long = "extension", value_name = "EXT", default_value = "dcm")]
    pub extensions: Vec<String>,

    /// Run report format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Harvesting configuration selected by the flags
    pub fn config(&self) -> HarvestConfig {
        HarvestConfig::default()
            .reconstruct_legacy(!self.no_reconstruct)
            .with_extensions(self.extensions.clone())
            .sorted_traversal(!self.unsorted)
    }
}

/// Command-line arguments for valuesets
#[derive(Parser, Debug)]
#[command(name = "valuesets")]
#[command(about = "Flatten value-set JSON documents into one CSV and parquet table")]
#[command(version)]
pub struct ValueSetsCli {
    /// Directory holding the value-set JSON documents
    #[arg(
        short,
        long,
        value_name = "DIR",
        default_value = "./sourceandrenderingpipeline/valuesets/valuesets/fhir/json"
    )]
    pub input_dir: PathBuf,

    /// Directory the tables are written to
    #[arg(short, long, value_name = "DIR", default_value = "./files")]
    pub out_dir: PathBuf,

    /// File name stem of the written tables
    #[arg(short, long, default_value = "fhir_valuesets")]
    pub stem: String,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ValueSetsCli {
    pub fn csv_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.csv", self.stem))
    }

    pub fn parquet_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.parquet", self.stem))
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// Initializes env_logger; `RUST_LOG` still overrides the level
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harvest_args() {
        let cli = Cli::try_parse_from([
            "csharvest",
            "sub-a",
            "sub-b",
            "--part6-csv",
            "tags.csv",
            "--out-file",
            "out.csv",
            "--extension",
            "dcm",
            "--extension",
            "IMA",
            "--no-reconstruct",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.subjects, vec![PathBuf::from("sub-a"), PathBuf::from("sub-b")]);
        assert_eq!(cli.format, OutputFormat::Json);

        let config = cli.config();
        assert!(!config.reconstruct_legacy);
        assert!(config.sorted_traversal);
        assert!(config.accepts_extension("ima"));
    }

    #[test]
    fn test_harvest_defaults() {
        let cli = Cli::try_parse_from([
            "csharvest",
            "sub-a",
            "--part6-csv",
            "tags.csv",
            "--out-file",
            "out.csv",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.extensions, vec!["dcm".to_string()]);
        assert!(cli.config().reconstruct_legacy);
    }

    #[test]
    fn test_subjects_required() {
        assert!(Cli::try_parse_from([
            "csharvest",
            "--part6-csv",
            "tags.csv",
            "--out-file",
            "out.csv"
        ])
        .is_err());
    }

    #[test]
    fn test_valuesets_paths() {
        let cli = ValueSetsCli::try_parse_from(["valuesets", "--out-dir", "tables"]).unwrap();
        assert_eq!(cli.csv_path(), PathBuf::from("tables/fhir_valuesets.csv"));
        assert_eq!(cli.parquet_path(), PathBuf::from("tables/fhir_valuesets.parquet"));
    }
}
