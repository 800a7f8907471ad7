//! Command-line host for a Homebase document.
//!
//! # Responsibility
//! - Open a SQLite-backed store and run one inspection or maintenance command.
//! - Keep output deterministic so it can be piped into other tools.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use homebase_core::{Clock, EntityKind, SqliteDocumentStore, Store, StoreConfig, SystemClock};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "homebase", version, about = "Inspect and maintain a Homebase document")]
struct Cli {
    /// SQLite database holding the document
    #[arg(long, value_name = "PATH")]
    db: PathBuf,

    /// Directory for rolling log files; logging is off when omitted
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log level used with --log-dir
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the number of records per collection
    Stats,
    /// Print the canonical document as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short = 'o', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Replace the stored document with a JSON file
    Import { file: PathBuf },
    /// Run weekly maintenance now
    Maintain,
    /// List calendar occurrences in a date range
    Agenda {
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: NaiveDate,
        #[arg(long, value_name = "YYYY-MM-DD")]
        to: NaiveDate,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Stats => "stats",
            Self::Export { .. } => "export",
            Self::Import { .. } => "import",
            Self::Maintain => "maintain",
            Self::Agenda { .. } => "agenda",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = StoreConfig::default().with_log_level(cli.log_level.clone());
    if let Some(log_dir) = &cli.log_dir {
        config.init_logging(log_dir).map_err(anyhow::Error::msg)?;
    }

    let raw_store = SqliteDocumentStore::open(&cli.db)
        .with_context(|| format!("opening database {}", cli.db.display()))?;
    let mut store = Store::open(raw_store, SystemClock, &config);
    info!("event=cli_command module=cli status=start command={}", cli.command.name());

    match cli.command {
        Command::Stats => {
            let doc = store.snapshot();
            println!("version={}", doc.version);
            for kind in EntityKind::ALL {
                println!("{}={}", kind.collection_key(), doc.count(kind));
            }
        }
        Command::Export { out } => {
            let json = serde_json::to_string_pretty(&*store.snapshot())
                .context("serializing document")?;
            match out {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let raw: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", file.display()))?;
            store.replace_document(&raw);
            println!("imported {}", file.display());
        }
        Command::Maintain => {
            let changed = store.run_maintenance();
            let week_start = store
                .snapshot()
                .settings
                .week_start
                .map(|date| date.to_string())
                .unwrap_or_default();
            println!(
                "today={} week_start={} changed={}",
                store.clock().today(),
                week_start,
                changed
            );
        }
        Command::Agenda { from, to } => {
            if to < from {
                bail!("--to must not be before --from");
            }
            for occurrence in store.occurrences(from, to) {
                let start = occurrence
                    .event
                    .start_time
                    .map(|time| time.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{}\t{}\t{}", occurrence.date(), start, occurrence.source_id);
            }
        }
    }

    store.close().context("writing document")?;
    Ok(())
}
