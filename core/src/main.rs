use clap::Parser;
use csharvest_core::cli::{setup_logging, Cli, OutputFormat};
use csharvest_core::{CsvAppender, HarvestConfig, Harvester, RunSummary, TagSelector, TextReport};
use log::{error, info};
use serde::Serialize;
use std::process;

/// JSON run report: the configuration used and what it produced
#[derive(Serialize)]
struct JsonReport<'a> {
    config: &'a HarvestConfig,
    out_file: String,
    summary: &'a RunSummary,
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    for subject in &cli.subjects {
        if !subject.is_dir() {
            eprintln!("Error: {} is not a directory", subject.display());
            process::exit(1);
        }
    }

    let selectors = match TagSelector::load_csv(&cli.part6_csv) {
        Ok(selectors) => selectors,
        Err(e) => {
            error!("Failed to load tags of interest: {}", e);
            eprintln!(
                "Error: Failed to load tags from {}: {}",
                cli.part6_csv.display(),
                e
            );
            process::exit(1);
        }
    };

    if selectors.is_empty() {
        eprintln!("Error: No tags listed in {}", cli.part6_csv.display());
        process::exit(1);
    }

    info!("Harvesting {} tags", selectors.len());

    let config = cli.config();
    let harvester = Harvester::new(&config, &selectors);
    let sink = CsvAppender::new(cli.out_file.clone());
    let summary = harvester.run(&cli.subjects, &sink);

    match cli.format {
        OutputFormat::Text => println!("{}", TextReport::new(&summary, sink.path())),
        OutputFormat::Json => {
            let report = JsonReport {
                config: &config,
                out_file: sink.path().display().to_string(),
                summary: &summary,
            };
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    error!("Failed to serialize to JSON: {}", e);
                    eprintln!("Error: Failed to serialize to JSON: {}", e);
                    process::exit(1);
                }
            }
        }
    }

    if summary.failed_subjects.len() == summary.subjects {
        process::exit(1);
    }
}
