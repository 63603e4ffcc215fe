//! barrel-calc - liquid volume calculator for 208 l barrels
//!
//! Converts a measured liquid height into volume and fill percentage, keeps a
//! persisted history of calculations and exports it as CSV or JSON.
//!
//! Module structure:
//! - `domain/` - Barrel profile, calculation result and record types
//! - `services/` - Calculator, history store, session, presenter
//! - `io/` - Storage backends and export delivery
//! - `infra/` - Config

use anyhow::Context;
use barrel_calc::domain::profile::FormulaMode;
use barrel_calc::infra::Config;
use barrel_calc::io::export::{write_export, ExportFormat};
use barrel_calc::io::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use barrel_calc::services::presenter::{history_line, profile_summary};
use barrel_calc::services::{HistoryStore, Session, VolumeCalculator};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Liquid volume calculator for 208 l barrels
#[derive(Parser, Debug)]
#[command(
    name = "barrel-calc",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"),
    about
)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// Override the configured formula
    #[arg(short, long, value_enum)]
    mode: Option<FormulaMode>,

    /// Override the history storage directory
    #[arg(long)]
    data_dir: Option<String>,

    /// Keep history in memory only (nothing is read or written)
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate volume for a height in centimeters and record it
    Calc {
        /// Liquid height (cm)
        #[arg(allow_hyphen_values = true)]
        height: String,
    },
    /// Read heights from stdin, one per line (empty line or "q" quits)
    Interactive,
    /// Print the calculation history, newest first
    History,
    /// Export the history to a file
    Export {
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,
        /// Output directory (defaults to export.dir from config)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Delete all recorded calculations
    Clear,
    /// Show the configured barrel profile
    Profile,
}

fn build_session(config: &Config, ephemeral: bool) -> Session<Box<dyn KeyValueStorage>> {
    let storage: Box<dyn KeyValueStorage> = if ephemeral {
        Box::new(MemoryStorage::new().with_max_bytes(config.storage_max_bytes()))
    } else {
        Box::new(FileStorage::new(config.storage_dir()).with_max_bytes(config.storage_max_bytes()))
    };

    let mut history = HistoryStore::open(storage, config.storage_key());
    if let Some(offset) = config.display_offset() {
        history = history.with_display_offset(offset);
    }

    let calculator = VolumeCalculator::new(config.profile().clone(), config.mode());
    Session::new(calculator, history)
}

fn submit_and_print<S: KeyValueStorage>(session: &mut Session<S>, input: &str) {
    let submission = session.submit(input);
    let message = submission.message();
    if message.is_error {
        eprintln!("{}", message.text());
    } else {
        println!("{}", message.text());
    }
    if let Some(e) = &submission.persistence_error {
        eprintln!("История не сохранена: {}", e);
    }
}

fn run_interactive<S: KeyValueStorage>(session: &mut Session<S>) -> anyhow::Result<()> {
    println!("{}", profile_summary(session.calculator().profile()));
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("Высота жидкости (в см): ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("q") {
            break;
        }
        submit_and_print(session, input);
        println!();
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; default WARN keeps command output clean, RUST_LOG=debug for more
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load_from_path(&args.config);
    if let Some(mode) = args.mode {
        config = config.with_mode(mode);
    }
    if let Some(dir) = args.data_dir {
        config = config.with_storage_dir(dir);
    }

    info!(
        config_file = %config.config_file(),
        mode = %config.mode().as_str(),
        max_height_cm = %config.profile().max_height_cm,
        capacity_liters = %config.profile().capacity_liters,
        storage_dir = %config.storage_dir(),
        ephemeral = %args.ephemeral,
        "config_loaded"
    );

    let mut session = build_session(&config, args.ephemeral);

    match args.command {
        Command::Calc { height } => submit_and_print(&mut session, &height),
        Command::Interactive => run_interactive(&mut session)?,
        Command::History => {
            let history = session.history();
            if history.is_empty() {
                println!("История пуста");
            }
            for record in history.records() {
                println!("{}", history_line(record, history.display_offset()));
            }
        }
        Command::Export { format, out } => match session.export(format) {
            Some(bytes) => {
                let dir = out.unwrap_or_else(|| PathBuf::from(config.export_dir()));
                let path = write_export(&dir, format, &bytes, Local::now().date_naive())
                    .with_context(|| format!("Failed to write export to {}", dir.display()))?;
                println!("{}", path.display());
            }
            None => println!("История пуста, экспортировать нечего"),
        },
        Command::Clear => {
            if let Err(e) = session.clear() {
                eprintln!("Не удалось удалить сохранённую историю: {}", e);
            }
        }
        Command::Profile => {
            println!("{}", profile_summary(session.calculator().profile()));
            println!("Формула: {}", session.calculator().mode().as_str());
        }
    }

    Ok(())
}
