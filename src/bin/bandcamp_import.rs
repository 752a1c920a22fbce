use clap::{ArgAction, Parser};
use sltools::exit::report;
use sltools::logging::{IMPORT_LEVELS, LoggingOptions, Verbosity};
use sltools_album::{Importer, parse_separator, read_table};
use sltools_config::{Config, LogFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use time::OffsetDateTime;

/// Unpack album archives downloaded from Bandcamp into a music library.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The table listing the albums to import (columns Artist, Album, Year)
    input_csv: PathBuf,
    /// The directory containing the downloaded zip files
    input_dir: PathBuf,
    /// The root directory of the organized music library
    output_dir: PathBuf,
    /// Field separator of the table [default: tab]
    #[arg(short, long, value_parser = parse_separator)]
    separator: Option<char>,
    /// Additionally write logs to this file
    #[arg(short = 'l', long = "log_file")]
    log_file: Option<PathBuf>,
    /// Increase output verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbosity: u8,
    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Log output format (text or json)
    #[arg(long)]
    log_format: Option<LogFormat>,
    /// Continue with the next album when one fails
    #[arg(short, long)]
    keep_going: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => return report(&err),
    };
    if let Some(separator) = args.separator {
        config.album.separator = separator;
    }

    let verbosity = Verbosity::from_count(IMPORT_LEVELS, args.verbosity);
    let logging = LoggingOptions {
        level: verbosity.level,
        file: args.log_file.clone().or(config.logging.file.clone()),
        format: args.log_format.unwrap_or(config.logging.format),
    };
    if let Err(err) = logging.init() {
        return report(&err);
    }
    verbosity.warn_if_clamped();

    let started = Instant::now();
    tracing::debug!(start = %OffsetDateTime::now_utc(), "Import started");
    let result = read_table(&args.input_csv, config.album.separator).and_then(|rows| {
        Importer::new(&config.album, &args.input_dir, &args.output_dir)?.keep_going(args.keep_going).import_all(&rows)
    });
    tracing::debug!(end = %OffsetDateTime::now_utc(), "Import finished");
    tracing::debug!("Total time in minutes: {:.2}", started.elapsed().as_secs_f64() / 60.0);

    match result {
        Ok(summary) => {
            tracing::info!(imported = summary.imported, "Done");
            ExitCode::SUCCESS
        },
        Err(err) => report(&err),
    }
}
