//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::{CsvPriceAdapter, CsvTableWriter};
use crate::adapters::definitions_adapter::load_definitions;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::calendar::format_date;
use crate::domain::config_validation::{RunConfig, build_run_config};
use crate::domain::error::IndigridError;
use crate::domain::indicator::IndicatorDefinition;
use crate::domain::series::PriceField;
use crate::domain::tabulate::tabulate;
use crate::domain::universe::{parse_symbols, resolve_symbols};
use crate::ports::price_port::PricePort;
use crate::ports::table_port::TablePort;

#[derive(Parser, Debug)]
#[command(
    name = "indigrid",
    about = "Technical indicator tables on a shared trading calendar"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute every configured indicator and write one table per output
    Compute {
        #[arg(short, long)]
        config: PathBuf,
        /// Output directory, overriding [output] directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Comma-separated symbols, overriding [run] symbols
        #[arg(long)]
        symbols: Option<String>,
    },
    /// Validate an indicator definition document (JSON, or YAML by extension)
    Validate {
        #[arg(short, long)]
        definitions: PathBuf,
    },
    /// Show the master date range and symbol coverage
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Outcome of one `compute` run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    pub master_dates: usize,
    pub processed: Vec<String>,
    pub skipped: Vec<String>,
    pub tables_written: Vec<String>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Compute {
            config,
            output,
            symbols,
        } => run_compute(&config, output, symbols.as_deref()),
        Command::Validate { definitions } => run_validate(&definitions),
        Command::Info { config } => run_info(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load and validate the run configuration, applying command-line overrides.
pub fn load_run_config(
    path: &PathBuf,
    output: Option<PathBuf>,
    symbols: Option<&str>,
) -> Result<RunConfig, IndigridError> {
    let adapter = FileConfigAdapter::from_file(path)?;
    let mut run = build_run_config(&adapter)?;

    if let Some(dir) = output {
        run.output_dir = dir;
    }
    if let Some(raw) = symbols {
        let parsed = parse_symbols(raw).map_err(|e| IndigridError::ConfigInvalid {
            section: "cli".into(),
            key: "symbols".into(),
            reason: e.to_string(),
        })?;
        run.symbols = Some(parsed);
    }
    Ok(run)
}

fn run_compute(
    config_path: &PathBuf,
    output: Option<PathBuf>,
    symbols: Option<&str>,
) -> Result<(), IndigridError> {
    info!(config = %config_path.display(), "loading config");
    let run = load_run_config(config_path, output, symbols)?;

    let definitions = load_definitions(&run.definitions_path)?;
    if definitions.is_empty() {
        warn!(path = %run.definitions_path.display(), "no indicator definitions");
    }

    let prices = CsvPriceAdapter::new(
        run.close_path.clone(),
        run.high_path.clone(),
        run.low_path.clone(),
    );
    let writer = CsvTableWriter::new(run.output_dir.clone());

    run_pipeline(&prices, &writer, &definitions, &run).map(|_| ())
}

/// Load the price tables, tabulate every symbol and persist every table.
pub fn run_pipeline(
    price_port: &dyn PricePort,
    table_port: &dyn TablePort,
    definitions: &[IndicatorDefinition],
    run: &RunConfig,
) -> Result<PipelineSummary, IndigridError> {
    let prices = price_port.load_all()?;

    let master = prices.master_axis(run.max_dates);
    if master.is_empty() {
        return Err(IndigridError::MalformedTable {
            table: PriceField::Close.to_string(),
            reason: "no dates".into(),
        });
    }

    let symbols = resolve_symbols(run.symbols.as_deref(), &prices);
    info!(
        symbols = symbols.len(),
        indicators = definitions.len(),
        dates = master.len(),
        "computing indicators"
    );

    let tabulation = tabulate(&prices, &master, &symbols, definitions, run.default_fill);
    table_port.write_all(&tabulation.tables)?;

    let summary = PipelineSummary {
        master_dates: master.len(),
        processed: tabulation.processed,
        skipped: tabulation.skipped.into_iter().map(|s| s.symbol).collect(),
        tables_written: tabulation.tables.into_iter().map(|t| t.name).collect(),
    };
    info!(
        processed = summary.processed.len(),
        skipped = summary.skipped.len(),
        tables = summary.tables_written.len(),
        "run complete"
    );
    Ok(summary)
}

fn run_validate(path: &PathBuf) -> Result<(), IndigridError> {
    let definitions = load_definitions(path)?;
    println!("{}: {} definitions", path.display(), definitions.len());
    for (i, def) in definitions.iter().enumerate() {
        let fill = def
            .fill
            .map(|f| format!(" fill={f}"))
            .unwrap_or_default();
        println!("  #{i} {} -> {}{fill}", def.spec, def.output.names().join(", "));
    }
    Ok(())
}

fn run_info(config_path: &PathBuf) -> Result<(), IndigridError> {
    let run = load_run_config(config_path, None, None)?;
    let adapter = CsvPriceAdapter::new(run.close_path, run.high_path, run.low_path);
    let prices = adapter.load_all()?;

    let master = prices.master_axis(run.max_dates);
    match (master.first(), master.last()) {
        (Some(first), Some(last)) => println!(
            "master axis: {} dates, {} to {}",
            master.len(),
            format_date(first),
            format_date(last)
        ),
        _ => println!("master axis: empty"),
    }
    for field in PriceField::ALL {
        println!("{field}: {} symbols", prices.table(field).symbols().count());
    }

    let symbols = resolve_symbols(run.symbols.as_deref(), &prices);
    println!("selected: {} symbols", symbols.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compute_args() {
        let cli = Cli::parse_from([
            "indigrid",
            "compute",
            "--config",
            "run.ini",
            "-o",
            "out",
            "--symbols",
            "AAA,BBB",
        ]);
        match cli.command {
            Command::Compute {
                config,
                output,
                symbols,
            } => {
                assert_eq!(config, PathBuf::from("run.ini"));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert_eq!(symbols.as_deref(), Some("AAA,BBB"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_validate_args() {
        let cli = Cli::parse_from(["indigrid", "validate", "-d", "defs.json"]);
        assert!(matches!(cli.command, Command::Validate { .. }));
    }

    #[test]
    fn missing_config_file_fails_with_io_code() {
        let code = run(Cli::parse_from([
            "indigrid",
            "info",
            "--config",
            "/nonexistent/run.ini",
        ]));
        assert_eq!(code, ExitCode::from(1));
    }
}
