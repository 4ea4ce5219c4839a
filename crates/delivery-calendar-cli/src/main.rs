//! `delivery-calendar`: project delivery times and measure working time from
//! the command line. Results are printed to stdout as JSON; logs go to stderr.

mod config;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use delivery_calendar::{BusinessCalendar, BusinessWindow, HolidayPeriod};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::config::{parse_holiday, parse_timestamp, parse_window, CalendarConfig};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Business-calendar arithmetic over working hours, weekends, and holidays
#[derive(Parser)]
#[command(name = "delivery-calendar", version, about, long_about = None)]
struct Cli {
    /// JSON calendar config ({"window": "09:00-17:00", "holidays": [...]})
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Daily business window, overriding the config file
    #[arg(short, long, global = true, value_name = "HH:MM-HH:MM", value_parser = parse_window)]
    window: Option<BusinessWindow>,

    /// Holiday date or inclusive range; repeatable
    #[arg(long = "holiday", global = true, value_name = "DATE[..DATE]", value_parser = parse_holiday)]
    holidays: Vec<HolidayPeriod>,

    /// Log to stderr (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// When is work started at AT done after HOURS of working time?
    Project {
        /// Origin timestamp (YYYY-MM-DDTHH:MM[:SS])
        #[arg(long, value_parser = parse_timestamp)]
        at: NaiveDateTime,

        /// Working hours to consume (may be fractional)
        #[arg(long)]
        hours: f64,
    },
    /// Working time elapsed between START and END
    Duration {
        #[arg(long, value_parser = parse_timestamp)]
        start: NaiveDateTime,

        #[arg(long, value_parser = parse_timestamp)]
        end: NaiveDateTime,
    },
    /// Is AT working time?
    Check {
        #[arg(long, value_parser = parse_timestamp)]
        at: NaiveDateTime,
    },
}

#[derive(Serialize)]
struct Projection {
    origin: String,
    hours: f64,
    delivery: String,
}

#[derive(Serialize)]
struct Elapsed {
    start: String,
    end: String,
    working_hours: f64,
    working_days: f64,
}

#[derive(Serialize)]
struct Check {
    at: String,
    working_instant: bool,
    working_day: bool,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    } else {
        EnvFilter::new(default)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();
}

fn build_calendar(cli: &Cli) -> Result<BusinessCalendar> {
    let file = match &cli.config {
        Some(path) => CalendarConfig::load(path)?,
        None => CalendarConfig::default(),
    };
    file.with_overrides(cli.window, cli.holidays.clone())
        .into_calendar()
}

fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

fn run(cli: &Cli) -> Result<serde_json::Value> {
    let calendar = build_calendar(cli)?;

    let value = match cli.command {
        Command::Project { at, hours } => {
            let delivery = calendar.project(at, hours)?;
            serde_json::to_value(Projection {
                origin: format_timestamp(at),
                hours,
                delivery: format_timestamp(delivery),
            })?
        }
        Command::Duration { start, end } => serde_json::to_value(Elapsed {
            start: format_timestamp(start),
            end: format_timestamp(end),
            working_hours: calendar.duration_in_working_hours(start, end)?,
            working_days: calendar.duration_in_working_days(start, end)?,
        })?,
        Command::Check { at } => serde_json::to_value(Check {
            at: format_timestamp(at),
            working_instant: calendar.is_working_instant(at),
            working_day: calendar.is_working_day(at.date()),
        })?,
    };

    Ok(value)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = run(&cli)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
