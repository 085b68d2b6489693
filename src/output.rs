//! Output formatting and persistence for query results.
//!
//! Supports plain-text rendering, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::granularity::Granularity;
use crate::record::TripRecord;
use crate::store::{LoadSummary, Lookup};
use csv::WriterBuilder;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::path::Path;

/// One line of an exported ranking.
#[derive(Debug, Serialize)]
pub struct RankingRow {
    pub rank: usize,
    pub granularity: Granularity,
    pub origin: u32,
    pub destination: u32,
    pub mean_travel_time: f64,
    pub standard_deviation_travel_time: f64,
}

impl RankingRow {
    pub fn from_ranking(granularity: Granularity, records: &[&TripRecord]) -> Vec<RankingRow> {
        records
            .iter()
            .enumerate()
            .map(|(i, r)| RankingRow {
                rank: i + 1,
                granularity,
                origin: r.origin(),
                destination: r.destination(),
                mean_travel_time: r.mean_travel_time(),
                standard_deviation_travel_time: r.standard_deviation_travel_time(),
            })
            .collect()
    }
}

/// Renders the zone bounds and per-file counts of a load.
pub fn render_summary(summary: &LoadSummary) -> String {
    let mut out = String::new();
    let zone = |z: Option<u32>| z.map_or_else(|| "n/a".to_string(), |z| z.to_string());

    if let Some(quarter) = summary.quarter {
        let _ = writeln!(out, "Quarter {}", quarter);
    }
    let _ = writeln!(out, "Trips in the monthly file: {}", summary.month_records);
    let _ = writeln!(out, "Trips in the daily file: {}", summary.day_records);
    let _ = writeln!(out, "Trips in the hourly file: {}", summary.hour_records);
    let _ = writeln!(out, "Total trips loaded: {}", summary.total_records);
    let _ = writeln!(out, "Lowest zone id: {}", zone(summary.min_zone_id));
    let _ = write!(out, "Highest zone id: {}", zone(summary.max_zone_id));
    out
}

/// Renders the answer to an origin/destination lookup.
pub fn render_lookup(origin: u32, destination: u32, granularity: Granularity, lookup: &Lookup) -> String {
    match lookup {
        Lookup::Found {
            position,
            mean_travel_time,
            standard_deviation_travel_time,
        } => format!(
            "Trip {position} ({origin} -> {destination}, {granularity}): mean travel time {mean_travel_time:.2}, standard deviation {standard_deviation_travel_time:.2}"
        ),
        Lookup::NotFound => {
            format!("No {granularity} data for trips from zone {origin} to zone {destination}")
        }
    }
}

/// Renders a ranking as numbered lines, largest mean first.
pub fn render_ranking(granularity: Granularity, records: &[&TripRecord]) -> String {
    if records.is_empty() {
        return format!("No {granularity} trips loaded");
    }
    records
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{:>3}. {}", i + 1, r))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serializes any result as pretty-printed JSON.
pub fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Appends ranking rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_ranking(path: impl AsRef<Path>, rows: &[RankingRow]) -> Result<()> {
    let path = path.as_ref();
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, rows = rows.len(), "Appending ranking");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
