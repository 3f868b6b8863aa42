//! Command-line front end for shelflink.
//!
//! Reads a MARCXML export and prints the shelf listing (records in call-number
//! order), the domain report, or both. Logs go to stderr; reports go to stdout
//! or the `--output` file.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use shelflink::config::ShelflinkConfig;
use shelflink::extractor::extract_file;
use shelflink::grouping::{analyze, MembershipPolicy};
use shelflink::recovery::RecoveryMode;
use shelflink::report::{write_report, write_shelf_listing, ReportFormat};
use shelflink::url::ClassifierKind;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Call numbers and links from MARCXML catalog exports.
#[derive(Debug, Parser)]
#[command(name = "shelflink", version)]
#[command(about = "Sort MARCXML records by call number and group them by link domain")]
struct Cli {
    /// MARCXML file to read.
    input: PathBuf,

    /// JSON configuration file; flags below override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print records in call-number order.
    #[arg(long)]
    sort: bool,

    /// Print the domain report. With neither --sort nor --group, both are printed.
    #[arg(long)]
    group: bool,

    /// Write reports to FILE instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Stop at the first record without a 001 control field instead of skipping it.
    #[arg(long)]
    strict: bool,

    /// List a record once per matching URL in a domain group.
    #[arg(long)]
    keep_duplicates: bool,

    /// Only treat http, https and ftp links with a host as URLs.
    #[arg(long)]
    strict_urls: bool,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("shelflink error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ShelflinkConfig> {
    let mut config = match &cli.config {
        Some(path) => ShelflinkConfig::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ShelflinkConfig::default(),
    };

    if cli.strict {
        config.extractor.recovery_mode = RecoveryMode::Strict;
    }
    if cli.strict_urls {
        config.extractor.classifier = ClassifierKind::Scheme;
    }
    if cli.keep_duplicates {
        config.grouping.membership = MembershipPolicy::PerUrl;
    }
    if let Some(format) = cli.format {
        config.report.format = format.into();
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    let extraction = extract_file(&cli.input, &config.extractor)
        .with_context(|| format!("extracting records from {}", cli.input.display()))?;
    if extraction.stats.records_skipped > 0 {
        tracing::warn!(
            skipped = extraction.stats.records_skipped,
            "records without a 001 control field were left out"
        );
    }

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let (sort, group) = if cli.sort || cli.group {
        (cli.sort, cli.group)
    } else {
        (true, true)
    };

    if sort {
        write_shelf_listing(&mut out, &extraction.records, config.report.format)?;
    }
    if group {
        if sort {
            writeln!(out)?;
        }
        let analysis = analyze(&extraction.records, &config.grouping);
        write_report(&mut out, &analysis, config.report.format)?;
    }

    out.flush()?;
    Ok(())
}
