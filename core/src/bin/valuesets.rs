use clap::Parser;
use csharvest_core::catalog::load_directory;
use csharvest_core::cli::{setup_logging, ValueSetsCli};
use log::{error, info};
use std::process;

fn main() {
    let cli = ValueSetsCli::parse();

    setup_logging(cli.verbose);

    if !cli.input_dir.is_dir() {
        eprintln!("Error: {} is not a directory", cli.input_dir.display());
        process::exit(1);
    }

    info!("Processing directory: {}", cli.input_dir.display());

    let table = match load_directory(&cli.input_dir) {
        Ok(table) => table,
        Err(e) => {
            error!("Failed to read directory: {}", e);
            eprintln!("Error: Failed to read directory: {}", e);
            process::exit(1);
        }
    };

    info!(
        "Flattened {} concepts into {} columns",
        table.len(),
        table.columns().len()
    );

    if let Err(e) = std::fs::create_dir_all(&cli.out_dir) {
        eprintln!("Error: Failed to create {}: {}", cli.out_dir.display(), e);
        process::exit(1);
    }

    let csv_path = cli.csv_path();
    let parquet_path = cli.parquet_path();
    let written = table
        .write_csv(&csv_path)
        .and_then(|_| table.write_parquet(&parquet_path));

    if let Err(e) = written {
        error!("Failed to write tables: {}", e);
        eprintln!("Error: Failed to write tables: {}", e);
        process::exit(1);
    }

    println!(
        "Files saved: {} and {}",
        csv_path.display(),
        parquet_path.display()
    );
}
