//! Where the quarterly aggregate files live and how they are read.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::granularity::{Granularity, Quarter};

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_DATASET: &str = "bogota-cadastral-2018";

/// Which data rows of a source file are ingested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowSampling {
    /// Every data row after the header.
    #[default]
    All,
    /// Only the 2nd, 4th, 6th... data row, as the legacy loader did. An
    /// unpaired trailing row is dropped.
    EveryOther,
}

/// Source location and ingestion settings.
///
/// Stored as a JSON object on disk, every key optional:
/// ```json
/// {
///   "data_dir": "./data",
///   "dataset": "bogota-cadastral-2018",
///   "row_sampling": "all"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub data_dir: PathBuf,
    pub dataset: String,
    pub row_sampling: RowSampling,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            dataset: DEFAULT_DATASET.to_string(),
            row_sampling: RowSampling::default(),
        }
    }
}

impl SourceConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Applies `TRIP_DATA_DIR` and `TRIP_DATASET` when they are set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("TRIP_DATA_DIR").ok(),
            std::env::var("TRIP_DATASET").ok(),
        )
    }

    fn with_overrides(mut self, data_dir: Option<String>, dataset: Option<String>) -> Self {
        if let Some(dir) = data_dir.filter(|d| !d.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dataset) = dataset.filter(|d| !d.is_empty()) {
            self.dataset = dataset;
        }
        self
    }

    /// File name of the aggregate for `quarter` at `granularity`.
    pub fn file_name(&self, quarter: Quarter, granularity: Granularity) -> String {
        let suffix = match granularity {
            Granularity::Month => "All-MonthlyAggregate",
            Granularity::Day => "WeeklyAggregate",
            Granularity::Hour => "All-HourlyAggregate",
        };
        format!("{}-{}-{}.csv", self.dataset, quarter, suffix)
    }

    pub fn path_for(&self, quarter: Quarter, granularity: Granularity) -> PathBuf {
        self.data_dir.join(self.file_name(quarter, granularity))
    }
}
