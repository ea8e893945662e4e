//! `terrain` CLI: inspect availability and validate bookings from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Slot grid for a date, default schedule (08:00-22:00, hourly)
//! terrain slots --date 2026-03-16 -r reservations.json
//!
//! # Same grid as JSON, with a custom schedule, for one terrain of a shared file
//! terrain slots --date 2026-03-16 -s schedule.json -r reservations.json \
//!   --terrain-id terrain-1 --json
//!
//! # Would 13:00 for 90 minutes be accepted? (exit code 1 if not)
//! terrain check --date 2026-03-16 --start 13:00 --duration 90 -r reservations.json
//!
//! # End time of a booking
//! terrain end-time --start 20:30 --duration 90
//!
//! # Price of a booking
//! terrain quote -t terrain.json --duration 90
//!
//! # Book and append to the reservations file
//! terrain book -t terrain.json -r reservations.json --date 2026-03-16 \
//!   --start 13:00 --duration 60 --subject alice
//!
//! # Cancel a reservation in the file
//! terrain cancel -r reservations.json --id r-3
//! ```
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` or pass `-v`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;
use terrain_engine::{
    book, compute_end_time, enumerate_for_query, format_duration, quote, validate_booking,
    AvailabilityQuery, BookingRequest, FacilitySchedule, MemoryLedger, Reservation,
    ReservationLedger, Terrain, TimeOfDay,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "terrain",
    version,
    about = "Terrain slot availability and booking validation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log diagnostics at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the slot grid of a date
    Slots {
        /// Date to inspect (yyyy-mm-dd)
        #[arg(long)]
        date: NaiveDate,
        /// Schedule JSON file (default schedule if omitted)
        #[arg(short, long)]
        schedule: Option<String>,
        /// Reservations JSON file (no reservations if omitted)
        #[arg(short, long)]
        reservations: Option<String>,
        /// Only count reservations of this terrain
        #[arg(long)]
        terrain_id: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Validate a candidate booking without storing it
    Check {
        #[arg(long)]
        date: NaiveDate,
        /// Start time (HH:MM)
        #[arg(long)]
        start: TimeOfDay,
        /// Duration in minutes
        #[arg(long)]
        duration: u32,
        #[arg(short, long)]
        schedule: Option<String>,
        #[arg(short, long)]
        reservations: Option<String>,
        /// Only count reservations of this terrain
        #[arg(long)]
        terrain_id: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute the end time of a booking
    EndTime {
        #[arg(long)]
        start: TimeOfDay,
        #[arg(long)]
        duration: u32,
    },
    /// Price a booking on a terrain
    Quote {
        /// Terrain JSON file
        #[arg(short, long)]
        terrain: String,
        #[arg(long)]
        duration: u32,
    },
    /// Validate a booking and append it to a reservations file
    Book {
        #[arg(short, long)]
        terrain: String,
        /// Reservations JSON file, rewritten in place (created if missing)
        #[arg(short, long)]
        reservations: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        start: TimeOfDay,
        #[arg(long)]
        duration: u32,
        /// Identifier of the reserving party
        #[arg(long)]
        subject: String,
    },
    /// Cancel a reservation in a reservations file
    Cancel {
        #[arg(short, long)]
        reservations: String,
        #[arg(long)]
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Slots {
            date,
            schedule,
            reservations,
            terrain_id,
            json,
        } => {
            let schedule = load_schedule(schedule.as_deref())?;
            let query = AvailabilityQuery {
                date,
                reservations: for_terrain(
                    load_reservations(reservations.as_deref())?,
                    terrain_id.as_deref(),
                ),
            };
            let slots =
                enumerate_for_query(&schedule, &query).context("Failed to enumerate slots")?;
            info!(%date, slots = slots.len(), "enumerated slots");

            if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                for slot in &slots {
                    match &slot.reservation_id {
                        Some(id) => println!("{}  occupied  {}", slot.interval, id),
                        None => println!("{}  free", slot.interval),
                    }
                }
            }
        }
        Commands::Check {
            date,
            start,
            duration,
            schedule,
            reservations,
            terrain_id,
            json,
        } => {
            let schedule = load_schedule(schedule.as_deref())?;
            let reservations = for_terrain(
                load_reservations(reservations.as_deref())?,
                terrain_id.as_deref(),
            );

            match validate_booking(&schedule, date, start, duration, &reservations) {
                Ok(interval) => {
                    info!(%date, %interval, "candidate accepted");
                    if json {
                        println!("{}", serde_json::to_string_pretty(&interval)?);
                    } else {
                        println!("Available: {} ({})", interval, format_duration(duration));
                    }
                }
                Err(reason) => {
                    info!(%date, %start, duration, %reason, "candidate rejected");
                    if json {
                        println!("{}", serde_json::to_string_pretty(&reason)?);
                    } else {
                        println!("Rejected: {}", reason);
                    }
                    process::exit(1);
                }
            }
        }
        Commands::EndTime { start, duration } => {
            let end = compute_end_time(start, duration).context("Failed to compute end time")?;
            println!("{}", end);
        }
        Commands::Quote { terrain, duration } => {
            let terrain = load_terrain(&terrain)?;
            let price = quote(&terrain, duration).context("Failed to price booking")?;
            println!("{}: {} for {:.2}", terrain.name, format_duration(duration), price);
        }
        Commands::Book {
            terrain,
            reservations,
            date,
            start,
            duration,
            subject,
        } => {
            let terrain = load_terrain(&terrain)?;
            let existing = if Path::new(&reservations).exists() {
                load_reservations(Some(reservations.as_str()))?
            } else {
                Vec::new()
            };
            let mut ledger = MemoryLedger::with_reservations(existing)
                .with_context(|| format!("Invalid reservations in {}", reservations))?;
            let request = BookingRequest {
                date,
                start,
                duration_minutes: duration,
                subject_id: subject,
            };

            let booked = book(&mut ledger, &terrain, &request).context("Booking failed")?;
            write_reservations(&reservations, ledger.all())?;
            info!(
                id = %booked.id,
                terrain = %booked.terrain_id,
                %date,
                interval = %booked.interval,
                "booked"
            );
            println!("Booked {} on {} at {}", booked.id, booked.date, booked.interval);
        }
        Commands::Cancel { reservations, id } => {
            let existing = load_reservations(Some(reservations.as_str()))?;
            let mut ledger = MemoryLedger::with_reservations(existing)
                .with_context(|| format!("Invalid reservations in {}", reservations))?;
            let cancelled = ledger.cancel(&id).context("Cancellation failed")?;
            write_reservations(&reservations, ledger.all())?;
            info!(id = %cancelled.id, "cancelled");
            println!("Cancelled {}", cancelled.id);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_schedule(path: Option<&str>) -> Result<FacilitySchedule> {
    match path {
        Some(path) => {
            let raw = read_input(Some(path))?;
            let schedule: FacilitySchedule = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid schedule JSON in {}", path))?;
            debug!(path, "loaded schedule");
            Ok(schedule)
        }
        None => {
            debug!("using default schedule");
            Ok(FacilitySchedule::default())
        }
    }
}

fn load_reservations(path: Option<&str>) -> Result<Vec<Reservation>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = read_input(Some(path))?;
    let reservations: Vec<Reservation> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid reservations JSON in {}", path))?;
    debug!(path, count = reservations.len(), "loaded reservations");
    Ok(reservations)
}

/// Keep only the reservations of `terrain_id`, or all of them when unset.
fn for_terrain(reservations: Vec<Reservation>, terrain_id: Option<&str>) -> Vec<Reservation> {
    match terrain_id {
        Some(id) => reservations
            .into_iter()
            .filter(|r| r.terrain_id == id)
            .collect(),
        None => reservations,
    }
}

fn load_terrain(path: &str) -> Result<Terrain> {
    let raw = read_input(Some(path))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid terrain JSON in {}", path))
}

/// Read a file, or stdin when the path is `-`.
fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

/// Replace the reservations file atomically: write a synced temp file next to it,
/// then rename it over the original.
fn write_reservations(path: &str, reservations: &[Reservation]) -> Result<()> {
    let json = serde_json::to_string_pretty(reservations)?;
    let target = Path::new(path);
    let mut tmp_name = target.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = target.with_file_name(tmp_name);

    let mut file = File::create(&tmp_path)
        .with_context(|| format!("Failed to create file: {}", tmp_path.display()))?;
    file.write_all(json.as_bytes())
        .and_then(|()| file.sync_all())
        .with_context(|| format!("Failed to write file: {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, target)
        .with_context(|| format!("Failed to replace file: {}", path))?;
    debug!(path, count = reservations.len(), "wrote reservations");
    Ok(())
}
