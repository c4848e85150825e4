//! `hours` CLI — resolve Waitwhile hours and booking slots from JSON documents.
//!
//! ## Usage
//!
//! ```sh
//! # Absolute business hours for the current week (waitlist JSON on stdin)
//! curl -s -H "apiKey: $KEY" https://api.waitwhile.com/v1/waitlists/$ID | hours week
//!
//! # Waitlist hours for the week containing a given day
//! hours week -i waitlist.json --kind waitlist --today 2026-10-14
//!
//! # Weekly display (HH:MM ranges, Monday first)
//! hours display -i waitlist.json --kind business
//!
//! # Booking slots for a date, with existing bookings
//! hours slots -i waitlist.json -b bookings.json --date 2026-10-14
//!
//! # Pin the clock and write to a file
//! hours slots -i waitlist.json --date 2026-10-14 --now 2026-10-14T08:00:00Z -o slots.json
//! ```
//!
//! Settings come from `hours.toml` (or `--config FILE`) and `HOURS_*`
//! environment variables, e.g. `HOURS_BOOKING_LENGTH_MINUTES=30`,
//! `HOURS_TIMEZONE=Europe/Oslo`.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use config::Config;
use hours_engine::{CachedProvider, DocumentProvider, HoursKind, HoursService, Settings};
use serde::Serialize;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = "hours.toml";

#[derive(Parser)]
#[command(
    name = "hours",
    version,
    about = "Waitwhile hours and booking slots from JSON documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (TOML); `hours.toml` is used when present
    #[arg(long, global = true)]
    config: Option<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Absolute hours for the current week, keyed by YYYYMMDD
    Week {
        /// Waitlist JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Which hours to resolve: business, waitlist or booking
        #[arg(short, long, default_value = "business")]
        kind: HoursKind,
        /// Any day of the week to resolve (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Weekly hours as HH:MM ranges, Monday first
    Display {
        /// Waitlist JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Which hours to show: business, waitlist or booking
        #[arg(short, long, default_value = "business")]
        kind: HoursKind,
    },
    /// Booking slots for one date
    Slots {
        /// Waitlist JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Bookings JSON array file
        #[arg(short, long)]
        bookings: Option<String>,
        /// Date to plan, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// Evaluate as of this RFC 3339 instant instead of the current time
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref())?;
    init_tracing(&settings.log_level);
    tracing::debug!(?settings, "settings loaded");

    let rendered = match cli.command {
        Commands::Week { input, kind, today } => {
            let service = build_service(&settings, input.as_deref(), None)?;
            let today = today.unwrap_or_else(|| service.today());
            let week = service
                .get_absolute_hours(kind, today)
                .with_context(|| format!("Failed to resolve {} hours for week of {}", kind, today))?;
            to_json(&week)?
        }
        Commands::Display { input, kind } => {
            let service = build_service(&settings, input.as_deref(), None)?;
            let display = service
                .get_weekly_display(kind)
                .with_context(|| format!("Failed to format {} hours", kind))?;
            to_json(&display)?
        }
        Commands::Slots {
            input,
            bookings,
            date,
            now,
        } => {
            let service = build_service(&settings, input.as_deref(), bookings.as_deref())?;
            let plan = match now {
                Some(now) => service.get_booking_slots_for_date_at(date, now),
                None => service.get_booking_slots_for_date(date),
            }
            .with_context(|| format!("Failed to plan booking slots for {}", date))?;
            to_json(&plan)?
        }
    };

    write_output(cli.output.as_deref(), &rendered)
}

/// Layer defaults, the settings file and `HOURS_*` environment variables.
///
/// An explicit `--config` file must exist; the default `hours.toml` is
/// optional.
fn load_settings(path: Option<&str>) -> Result<Settings> {
    let file = path.unwrap_or(DEFAULT_CONFIG_FILE);
    let settings: Settings = Config::builder()
        .add_source(config::File::with_name(file).required(path.is_some()))
        .add_source(config::Environment::with_prefix("HOURS").try_parsing(true))
        .build()
        .with_context(|| format!("Failed to load settings from {}", file))?
        .try_deserialize()
        .context("Failed to parse settings")?;

    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

/// Log to stderr; `RUST_LOG` overrides the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_service(
    settings: &Settings,
    waitlist_path: Option<&str>,
    bookings_path: Option<&str>,
) -> Result<HoursService<CachedProvider<DocumentProvider>>> {
    let waitlist = read_input(waitlist_path)?;
    let bookings = bookings_path
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read bookings file: {}", path))
        })
        .transpose()?;

    let provider = DocumentProvider::from_json(
        &waitlist,
        bookings.as_deref(),
        settings.booking_length_minutes,
    )
    .context("Failed to parse waitlist documents")?;

    let cached = CachedProvider::new(provider, settings.cache_ttl());
    Ok(HoursService::from_settings(cached, settings)?)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
