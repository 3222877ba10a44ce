//! DBC Code Generator CLI
//!
//! Command-line front end for the dbc-codegen library:
//! - Loads one DBC file
//! - Generates the C++ decode header
//! - Writes it to a file, or to stdout when no output path is given

use anyhow::{Context, Result};
use clap::Parser;
use dbc_codegen::Generator;
use std::path::PathBuf;

mod config;

/// DBC Code Generator - Generate C++ decode structs from CAN databases
#[derive(Parser, Debug)]
#[command(name = "dbc-codegen")]
#[command(about = "Generate a C++ header decoding CAN frames described by a DBC file", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the DBC file
    #[arg(value_name = "DBC")]
    dbc: Option<PathBuf>,

    /// Output header file (default: stdout)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::debug!("DBC Code Generator CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using generator library v{}", dbc_codegen::VERSION);

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };

    let Some(dbc_path) = args.dbc.clone().or(app_config.input.dbc.clone()) else {
        eprintln!("Usage: dbc-codegen <dbc> [output]");
        std::process::exit(1);
    };
    let output_path = args.output.clone().or(app_config.output.path.clone());

    let mut generator = Generator::with_config(app_config.generator);
    generator
        .add_dbc(&dbc_path)
        .with_context(|| format!("Failed to load DBC file: {:?}", dbc_path))?;

    let stats = generator.database_stats();
    log::info!(
        "Signal database: {} messages, {} signals",
        stats.num_messages,
        stats.num_signals
    );

    match &output_path {
        Some(path) => generator
            .generate_to_file(path)
            .with_context(|| format!("Failed to generate header {:?}", path))?,
        None => generator
            .generate(&mut std::io::stdout().lock())
            .context("Failed to generate header")?,
    }

    log::info!("Header generated successfully");
    Ok(())
}

/// Initialize logging based on verbosity level
///
/// Logs go to stderr so they never mix with a header written to stdout.
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments() {
        let args = Args::try_parse_from(["dbc-codegen", "vehicle.dbc", "vehicle.h"]).unwrap();
        assert_eq!(args.dbc, Some(PathBuf::from("vehicle.dbc")));
        assert_eq!(args.output, Some(PathBuf::from("vehicle.h")));

        let args = Args::try_parse_from(["dbc-codegen", "-vv", "vehicle.dbc"]).unwrap();
        assert_eq!(args.output, None);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_schema_path_optional_at_parse_time() {
        let args = Args::try_parse_from(["dbc-codegen"]).unwrap();
        assert!(args.dbc.is_none());
    }
}
