mod build;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "erpfeed")]
#[command(about = "Normalize extracted vendor orders into ERP order-sheet rows")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build canonical rows from extraction output files, in the given order
    Build {
        /// Extraction JSON files; a sibling `.csv` with the same stem is
        /// scanned for the file-level brand when present
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Write rows here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Pin the shelf date (YYYY/MM/DD or YYYY-MM-DD) instead of using today
        #[arg(long, value_parser = parse_shelf_date)]
        shelf_date: Option<NaiveDate>,

        /// Override ERPFEED_WORKERS for this run
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Normalize a release month to YYYYMM
    Month { value: String },
    /// Show the normalized source cutoff and the shifted internal cutoff
    Cutoff { value: String },
    /// Print the expanded shipper list
    Shippers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Tsv,
}

fn parse_shelf_date(raw: &str) -> Result<NaiveDate, String> {
    erpfeed_normalize::dates::parse_date(raw).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let config = erpfeed_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::info!(env = %config.env, workers = config.workers, "erpfeed starting");

    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            inputs,
            output,
            format,
            shelf_date,
            workers,
        } => build::run_build(
            &config,
            &build::BuildArgs {
                inputs,
                output,
                format,
                shelf_date,
                workers,
            },
        ),
        Commands::Month { value } => {
            println!("{}", erpfeed_normalize::normalize_release_month(&value));
            Ok(())
        }
        Commands::Cutoff { value } => {
            let source = erpfeed_normalize::normalize_date(&value);
            let internal = erpfeed_normalize::shift_cutoff_backward(&value)
                .unwrap_or_else(|| source.clone());
            println!("結單日期\t{source}");
            println!("內部結單日期\t{internal}");
            Ok(())
        }
        Commands::Shippers => {
            let tables = erpfeed_core::ReferenceTables::load(
                &erpfeed_core::ReferencePaths::from_app_config(&config),
            )?;
            for name in tables.shippers.as_slice() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
