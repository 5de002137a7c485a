//! SHIELDSYNC CLI - Terminal front end for the cart.
//!
//! # Usage
//!
//! ```bash
//! # List the plans on sale
//! shieldsync catalog
//!
//! # Shop interactively
//! shieldsync session
//!
//! # Replay a script with log-only notifications and JSON snapshots
//! shieldsync session --input demo.cart --notifications log --json
//! ```
//!
//! # Commands
//!
//! - `catalog` - List the plans on sale
//! - `session` - Run a cart session (see [`commands::session`])

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use shieldsync_core::{CartStore, RecordingNotifier};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod notifier;
mod render;

use commands::session::{self, SessionContext};
use config::{CliConfig, LogFormat, NotificationMode};
use notifier::HistoryNotifier;

#[derive(Parser)]
#[command(name = "shieldsync")]
#[command(author, version, about = "SHIELDSYNC cart tools")]
struct Cli {
    /// YAML product catalog (overrides `SHIELDSYNC_CATALOG`)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Log line format (overrides `SHIELDSYNC_LOG_FORMAT`)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the plans on sale
    Catalog,
    /// Run a cart session
    Session {
        /// Read commands from a file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Where to show notifications (overrides `SHIELDSYNC_NOTIFICATIONS`)
        #[arg(short, long, value_enum)]
        notifications: Option<NotificationMode>,

        /// Print cart snapshots as JSON lines
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shieldsync_cli=info,shieldsync_core=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr),
            )
            .init(),
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let notifications = match &cli.command {
        Commands::Session { notifications, .. } => *notifications,
        Commands::Catalog => None,
    };
    let config = config.with_overrides(cli.catalog.clone(), notifications, cli.log_format);

    init_tracing(config.log_format);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli.command, &config);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = commands::catalog::load(config.catalog_path.as_deref())?;

    match command {
        Commands::Catalog => commands::catalog::list(&catalog, &mut io::stdout().lock())?,
        Commands::Session { input, json, .. } => {
            let history = Arc::new(RecordingNotifier::bounded(notifier::HISTORY_LIMIT));
            let store = CartStore::new(HistoryNotifier::new(
                Arc::clone(&history),
                notifier::sink_for(config.notifications),
            ));
            let ctx = SessionContext {
                store: &store,
                catalog: &catalog,
                history: &history,
                json,
            };
            let output = Arc::new(Mutex::new(io::stdout()));

            let summary = match input {
                Some(path) => session::run(&ctx, BufReader::new(File::open(path)?), output)?,
                None => session::run(&ctx, io::stdin().lock(), output)?,
            };

            tracing::info!(
                commands = summary.commands,
                errors = summary.errors,
                items = summary.snapshot.item_count(),
                total = %summary.snapshot.total(),
                "Session finished"
            );
        }
    }
    Ok(())
}
