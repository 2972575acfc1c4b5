//! `wlpclean` - command line front end for the corpus cleaner.
//!
//! ```text
//! wlpclean clean <INPUT> <OUTPUT> [--config FILE] [--keep-null] [--malformed-tag TAG]
//!                                 [--null-substitute TEXT] [--jobs N] [--report FILE]
//! wlpclean text  <INPUT> <OUTPUT> [--config FILE] [--jobs N]
//! ```

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use wlpclean::{CorpusReport, CorpusRunner, Overrides, Settings, export_text};

#[derive(Parser)]
#[command(name = "wlpclean", version)]
#[command(about = "Cleans word/lemma/POS tagged corpora and inserts sentence boundaries")]
struct Cli {
    /// YAML settings file; defaults apply when omitted
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Filter directive used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clean every tagged document under INPUT into OUTPUT
    Clean {
        input: PathBuf,
        output: PathBuf,

        /// Keep `null`-tagged control placeholders
        #[arg(long)]
        keep_null: bool,

        /// Suffix for re-derived tags
        #[arg(long)]
        malformed_tag: Option<String>,

        /// Replacement for null bytes and missing columns
        #[arg(long)]
        null_substitute: Option<String>,

        /// Worker threads
        #[arg(long, short)]
        jobs: Option<usize>,

        /// Write the JSON run report here instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Turn cleaned tagged documents under INPUT into plain text under OUTPUT
    Text {
        input: PathBuf,
        output: PathBuf,

        /// Worker threads
        #[arg(long, short)]
        jobs: Option<usize>,

        /// Write the JSON run report here instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, &cli.log_level, cli.log_file.as_deref())?;

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let (report, report_path) = match cli.command {
        Command::Clean {
            input,
            output,
            keep_null,
            malformed_tag,
            null_substitute,
            jobs,
            report,
        } => {
            let overrides = Overrides {
                keep_null,
                malformed_tag,
                null_substitute,
                jobs,
            };
            let settings = settings.with_overrides(&overrides)?;
            let runner = CorpusRunner::new(&settings)?;
            (runner.clean_corpus(&input, &output)?, report)
        }
        Command::Text {
            input,
            output,
            jobs,
            report,
        } => {
            let overrides = Overrides {
                jobs,
                ..Default::default()
            };
            let settings = settings.with_overrides(&overrides)?;
            let report_value = export_text(
                &input,
                &output,
                &settings.corpus,
                &settings.cleaner.skip_token,
            )?;
            (report_value, report)
        }
    };

    emit_report(&report, report_path.as_deref())?;
    if !report.is_success() {
        anyhow::bail!(
            "{} of {} documents failed",
            report.documents_failed,
            report.documents
        );
    }
    Ok(())
}

fn emit_report(report: &CorpusReport, path: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match path {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("writing run report to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn init_tracing(format: LogFormat, level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level directive `{level}`"))?,
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true);

    match (log_file, format) {
        (Some(path), LogFormat::Json) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.json().with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        (Some(path), LogFormat::Pretty) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        (None, LogFormat::Json) => builder.json().with_writer(io::stderr).init(),
        (None, LogFormat::Pretty) => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}
