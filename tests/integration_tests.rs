use std::path::{Path, PathBuf};

use trip_aggregates::config::{RowSampling, SourceConfig};
use trip_aggregates::error::LoadError;
use trip_aggregates::granularity::{Granularity, Quarter};
use trip_aggregates::store::{AggregationStore, Lookup};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_config() -> SourceConfig {
    SourceConfig {
        data_dir: fixtures_dir(),
        ..Default::default()
    }
}

fn q1() -> Quarter {
    Quarter::try_from(1u8).unwrap()
}

fn loaded_store() -> AggregationStore {
    let mut store = AggregationStore::new();
    store
        .load(q1(), &fixture_config())
        .expect("Failed to load fixtures");
    store
}

#[test]
fn test_zone_bounds_across_all_files() {
    let store = loaded_store();
    assert_eq!(store.min_zone_id(), Some(3));
    assert_eq!(store.max_zone_id(), Some(12));
}

#[test]
fn test_record_counts() {
    let store = loaded_store();
    assert_eq!(store.count(Granularity::Month), 5);
    assert_eq!(store.count(Granularity::Day), 4);
    assert_eq!(store.count(Granularity::Hour), 3);
    assert_eq!(store.record_count(), 12);
}

#[test]
fn test_hourly_lookup() {
    let store = loaded_store();

    assert_eq!(
        store.average_and_deviation(7, 12, Granularity::Hour),
        Lookup::Found {
            position: 1,
            mean_travel_time: 1455.25,
            standard_deviation_travel_time: 330.75,
        }
    );
    assert_eq!(
        store.average_and_deviation(99, 12, Granularity::Hour),
        Lookup::NotFound
    );
}

#[test]
fn test_same_pair_differs_by_granularity() {
    let store = loaded_store();

    let month = store.average_and_deviation(7, 12, Granularity::Month);
    let day = store.average_and_deviation(7, 12, Granularity::Day);
    assert!(matches!(month, Lookup::Found { mean_travel_time, .. } if mean_travel_time == 1320.4));
    assert!(matches!(day, Lookup::Found { position: 0, mean_travel_time, .. } if mean_travel_time == 1410.2));
}

#[test]
fn test_top_n_monthly() {
    let store = loaded_store();
    let top = store.top_n_by_mean_travel_time(2, Granularity::Month);

    let pairs: Vec<(u32, u32)> = top.iter().map(|r| (r.origin(), r.destination())).collect();
    assert_eq!(pairs, vec![(3, 12), (12, 7)]);
    assert_eq!(top[0].mean_travel_time(), 2100.0);
}

#[test]
fn test_top_n_truncates_to_available() {
    let store = loaded_store();
    let top = store.top_n_by_mean_travel_time(50, Granularity::Hour);
    let means: Vec<f64> = top.iter().map(|r| r.mean_travel_time()).collect();
    assert_eq!(means, vec![1600.0, 1455.25, 1100.0]);
}

#[test]
fn test_cursor_traversal_over_daily_records() {
    let store = loaded_store();
    let mut cursor = store.cursor(Granularity::Day);

    let mut forward = Vec::new();
    while cursor.has_next() {
        forward.push(cursor.next().map(|r| r.origin()).unwrap());
    }
    assert_eq!(forward, vec![7, 3, 12, 7]);

    cursor.reset();
    let replay: Vec<u32> = std::iter::from_fn(|| cursor.next().map(|r| r.origin())).collect();
    assert_eq!(replay, forward);
}

#[test]
fn test_missing_hourly_file_keeps_month_and_day() {
    let dir = tempfile::tempdir().unwrap();
    let config = SourceConfig {
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    for granularity in [Granularity::Month, Granularity::Day] {
        std::fs::copy(
            fixture_config().path_for(q1(), granularity),
            config.path_for(q1(), granularity),
        )
        .unwrap();
    }

    let mut store = AggregationStore::new();
    let err = store.load(q1(), &config).unwrap_err();

    assert!(matches!(err, LoadError::Open { .. }));
    assert_eq!(err.path(), config.path_for(q1(), Granularity::Hour));

    assert_eq!(store.count(Granularity::Month), 5);
    assert_eq!(store.count(Granularity::Day), 4);
    assert_eq!(store.count(Granularity::Hour), 0);
    assert_eq!(store.record_count(), 9);
    assert!(matches!(
        store.average_and_deviation(3, 7, Granularity::Day),
        Lookup::Found { .. }
    ));
}

#[test]
fn test_missing_quarter_fails_on_first_file() {
    let mut store = AggregationStore::new();
    let err = store
        .load(Quarter::try_from(3u8).unwrap(), &fixture_config())
        .unwrap_err();

    assert!(matches!(err, LoadError::Open { .. }));
    assert_eq!(store.record_count(), 0);
    assert_eq!(store.min_zone_id(), None);
}

#[test]
fn test_legacy_row_sampling_on_fixtures() {
    let config = SourceConfig {
        row_sampling: RowSampling::EveryOther,
        ..fixture_config()
    };
    let mut store = AggregationStore::new();
    store.load(q1(), &config).unwrap();

    // every second data row: 2 of 5, 2 of 4, 1 of 3
    assert_eq!(store.count(Granularity::Month), 2);
    assert_eq!(store.count(Granularity::Day), 2);
    assert_eq!(store.count(Granularity::Hour), 1);
    assert_eq!(store.record_count(), 5);
    assert_eq!(store.min_zone_id(), Some(3));
    assert_eq!(store.max_zone_id(), Some(7));
    assert_eq!(
        store.average_and_deviation(7, 12, Granularity::Hour),
        Lookup::Found {
            position: 0,
            mean_travel_time: 1455.25,
            standard_deviation_travel_time: 330.75,
        }
    );
}
