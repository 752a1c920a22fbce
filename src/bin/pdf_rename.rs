use clap::{ArgAction, Parser};
use sltools::error::{ErrorKind, Result};
use sltools::exit::report;
use sltools::logging::{LoggingOptions, RENAME_LEVELS, Verbosity};
use sltools_config::{Config, LogFormat};
use sltools_lookup::HttpLookup;
use sltools_paper::{FilenameGenerator, PdfDocument, Renamer, Request, Resolver};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Rename the PDF of an academic paper after its bibliographic metadata.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The PDF to rename
    input_pdf: PathBuf,
    /// Resolve through arXiv with this identifier, and nothing else
    #[arg(short, long)]
    arxiv_id: Option<String>,
    /// Use this DOI instead of looking for one in the document
    #[arg(short, long)]
    doi: Option<String>,
    /// Search by this title instead of the first page's text
    #[arg(short, long)]
    title: Option<String>,
    /// Log the new name without renaming anything
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Never fall back to a full-text search
    #[arg(short = 'N', long)]
    no_text_search: bool,
    /// Additionally write logs to this file
    #[arg(short = 'l', long = "log_file")]
    log_file: Option<PathBuf>,
    /// Increase output verbosity (-v debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbosity: u8,
    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Log output format (text or json)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

impl Args {
    fn request(&self) -> Request {
        Request {
            arxiv_id: self.arxiv_id.clone(),
            doi: self.doi.clone(),
            title: self.title.clone(),
            text_search: !self.no_text_search,
        }
    }
}

fn check_input(path: &Path) -> Result<()> {
    if !path.is_file() {
        exn::bail!(ErrorKind::MissingInput(path.to_path_buf()));
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => return report(&err),
    };

    let verbosity = Verbosity::from_count(RENAME_LEVELS, args.verbosity);
    let logging = LoggingOptions {
        level: verbosity.level,
        file: args.log_file.clone().or(config.logging.file.clone()),
        format: args.log_format.unwrap_or(config.logging.format),
    };
    if let Err(err) = logging.init() {
        return report(&err);
    }
    verbosity.warn_if_clamped();

    if let Err(err) = check_input(&args.input_pdf) {
        return report(&err);
    }

    let lookup = HttpLookup::new(config.lookup.clone());
    let result = FilenameGenerator::from_config(&config.paper).and_then(|filenames| {
        let renamer = Renamer::new(Resolver::new(&lookup, config.paper.query_words), filenames, args.dry_run);
        renamer.rename(&args.request(), &PdfDocument::new(&args.input_pdf))
    });

    match result {
        Ok(action) => {
            tracing::debug!(?action, "Done");
            ExitCode::SUCCESS
        },
        Err(err) => report(&err),
    }
}
