//! In-memory store of one quarter's trip aggregates and the queries over it.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{RowSampling, SourceConfig};
use crate::cursor::CursorIterator;
use crate::error::LoadError;
use crate::granularity::{Granularity, Quarter};
use crate::record::TripRecord;
use crate::sequence::OrderedSequence;

/// Running bounds of origin zone ids and the number of records folded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneAccumulator {
    min: u32,
    max: u32,
    count: usize,
}

impl Default for ZoneAccumulator {
    fn default() -> Self {
        Self {
            min: u32::MAX,
            max: 0,
            count: 0,
        }
    }
}

impl ZoneAccumulator {
    pub fn record(&mut self, zone_id: u32) {
        self.min = self.min.min(zone_id);
        self.max = self.max.max(zone_id);
        self.count += 1;
    }

    pub fn merge(&mut self, other: &ZoneAccumulator) {
        if other.count == 0 {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.count += other.count;
    }

    pub fn min(&self) -> Option<u32> {
        (self.count > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<u32> {
        (self.count > 0).then_some(self.max)
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Outcome of an origin/destination lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Lookup {
    Found {
        /// Position of the matching record in its sequence.
        position: usize,
        mean_travel_time: f64,
        standard_deviation_travel_time: f64,
    },
    NotFound,
}

/// Counts and zone bounds after a load, for display.
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub quarter: Option<Quarter>,
    pub month_records: usize,
    pub day_records: usize,
    pub hour_records: usize,
    pub total_records: usize,
    pub min_zone_id: Option<u32>,
    pub max_zone_id: Option<u32>,
    pub generated_at: DateTime<Utc>,
}

/// Month, day and hour aggregates of one quarter.
#[derive(Debug, Default)]
pub struct AggregationStore {
    quarter: Option<Quarter>,
    sequences: [OrderedSequence<TripRecord>; 3],
    zones: ZoneAccumulator,
}

impl AggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the store's contents with the three aggregate files of `quarter`.
    ///
    /// Files are read month, day, hour. Each file is committed to the store
    /// only once it has been read completely, so on error the granularities
    /// loaded before the failing file stay queryable and the zone bounds and
    /// count cover exactly those.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if a file is missing or unreadable or a row does
    /// not parse.
    #[tracing::instrument(skip(self, config), fields(quarter = %quarter, data_dir = %config.data_dir.display()))]
    pub fn load(&mut self, quarter: Quarter, config: &SourceConfig) -> Result<(), LoadError> {
        *self = Self::new();
        self.quarter = Some(quarter);

        if config.row_sampling == RowSampling::EveryOther {
            warn!("Legacy row sampling enabled, only every second data row is loaded");
        }

        for granularity in Granularity::ALL {
            let path = config.path_for(quarter, granularity);
            let (sequence, zones) = read_sequence(&path, config.row_sampling).inspect_err(|e| {
                warn!(granularity = %granularity, error = %e, "Aggregate file failed to load");
            })?;

            info!(
                granularity = %granularity,
                path = %path.display(),
                records = sequence.len(),
                "Aggregate file loaded"
            );

            self.sequences[granularity.index()] = sequence;
            self.zones.merge(&zones);
        }

        info!(
            total = self.zones.count(),
            min_zone = ?self.zones.min(),
            max_zone = ?self.zones.max(),
            "Quarter loaded"
        );
        Ok(())
    }

    /// Quarter of the last `load` call, even if it failed part way.
    pub fn quarter(&self) -> Option<Quarter> {
        self.quarter
    }

    /// Smallest origin zone id across all loaded records.
    pub fn min_zone_id(&self) -> Option<u32> {
        self.zones.min()
    }

    /// Largest origin zone id across all loaded records.
    pub fn max_zone_id(&self) -> Option<u32> {
        self.zones.max()
    }

    pub fn record_count(&self) -> usize {
        self.zones.count()
    }

    pub fn count(&self, granularity: Granularity) -> usize {
        self.sequence(granularity).len()
    }

    pub fn sequence(&self, granularity: Granularity) -> &OrderedSequence<TripRecord> {
        &self.sequences[granularity.index()]
    }

    /// Mean and standard deviation of the first record going from `origin`
    /// to `destination` at `granularity`.
    pub fn average_and_deviation(
        &self,
        origin: u32,
        destination: u32,
        granularity: Granularity,
    ) -> Lookup {
        let found = self
            .sequence(granularity)
            .iter()
            .enumerate()
            .find(|(_, r)| r.origin() == origin && r.destination() == destination);

        match found {
            Some((position, record)) => {
                debug!(position, "Lookup matched");
                Lookup::Found {
                    position,
                    mean_travel_time: record.mean_travel_time(),
                    standard_deviation_travel_time: record.standard_deviation_travel_time(),
                }
            }
            None => Lookup::NotFound,
        }
    }

    /// The `n` records with the largest mean travel time, largest first.
    ///
    /// Equal means keep their source order. Asking for more records than
    /// exist returns all of them.
    pub fn top_n_by_mean_travel_time(&self, n: usize, granularity: Granularity) -> Vec<&TripRecord> {
        let mut ranked: Vec<&TripRecord> = self.sequence(granularity).iter().collect();
        ranked.sort_by(|a, b| b.mean_travel_time().total_cmp(&a.mean_travel_time()));
        ranked.truncate(n);
        ranked
    }

    /// A cursor over the records of `granularity`, positioned before the first.
    pub fn cursor(&self, granularity: Granularity) -> CursorIterator<&TripRecord> {
        CursorIterator::from(self.sequence(granularity).iter().collect::<OrderedSequence<_>>())
    }

    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            quarter: self.quarter,
            month_records: self.count(Granularity::Month),
            day_records: self.count(Granularity::Day),
            hour_records: self.count(Granularity::Hour),
            total_records: self.record_count(),
            min_zone_id: self.min_zone_id(),
            max_zone_id: self.max_zone_id(),
            generated_at: Utc::now(),
        }
    }
}

/// Reads every sampled data row of one aggregate file.
fn read_sequence(
    path: &Path,
    sampling: RowSampling,
) -> Result<(OrderedSequence<TripRecord>, ZoneAccumulator), LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let mut sequence = OrderedSequence::new();
    let mut zones = ZoneAccumulator::default();

    for (i, row) in reader.records().enumerate() {
        let row_number = i as u64 + 1;
        let row = row.map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if sampling == RowSampling::EveryOther && row_number % 2 == 1 {
            continue;
        }

        let record = TripRecord::try_from(&row).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            row: row_number,
            source,
        })?;

        zones.record(record.origin());
        if sequence.is_empty() {
            sequence.insert_front(record);
        } else {
            sequence.insert_back(record);
        }
    }

    Ok((sequence, zones))
}
