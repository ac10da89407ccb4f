use std::collections::HashMap;

use picks_terminal::date_resolver::{resolve_date, step_date};
use picks_terminal::snapshot::{DateBlock, Snapshot};
use picks_terminal::store::DataStore;

fn store_with(dates: &[&str]) -> DataStore {
    let by_date: HashMap<String, DateBlock> = dates
        .iter()
        .map(|d| (d.to_string(), DateBlock::default()))
        .collect();
    DataStore::with_snapshot(Snapshot {
        generated_at: None,
        dates: dates.iter().map(|d| d.to_string()).collect(),
        by_date,
        notes: None,
    })
}

#[test]
fn exact_match_is_returned_unchanged() {
    let store = store_with(&["2024-01-02", "2024-01-03", "2024-01-09"]);
    for date in store.dates() {
        assert_eq!(&resolve_date(date, &store), date);
    }
}

#[test]
fn absent_dates_fall_back_to_earliest() {
    let store = store_with(&["2024-01-02", "2024-01-05"]);
    for desired in ["2024-01-03", "2023-12-31", "2030-06-01", "", "not-a-date"] {
        assert_eq!(resolve_date(desired, &store), "2024-01-02", "desired={desired}");
    }
}

#[test]
fn fallback_uses_first_entry_even_when_later_is_closer() {
    let store = store_with(&["2024-01-02", "2024-01-05"]);
    assert_eq!(resolve_date("2024-01-06", &store), "2024-01-02");
}

#[test]
fn missing_snapshot_echoes_request() {
    let store = DataStore::new();
    assert_eq!(resolve_date("2024-01-03", &store), "2024-01-03");
}

#[test]
fn empty_date_list_echoes_request() {
    let store = store_with(&[]);
    assert_eq!(resolve_date("2024-01-03", &store), "2024-01-03");
}

#[test]
fn stepping_walks_available_dates_and_clamps() {
    let store = store_with(&["2024-01-02", "2024-01-05", "2024-01-07"]);
    assert_eq!(step_date("2024-01-02", 1, &store), "2024-01-05");
    assert_eq!(step_date("2024-01-05", 1, &store), "2024-01-07");
    assert_eq!(step_date("2024-01-07", 1, &store), "2024-01-07");
    assert_eq!(step_date("2024-01-05", -1, &store), "2024-01-02");
    assert_eq!(step_date("2024-01-02", -1, &store), "2024-01-02");
}

#[test]
fn stepping_from_unknown_date_starts_at_fallback() {
    let store = store_with(&["2024-01-02", "2024-01-05"]);
    assert_eq!(step_date("2024-01-04", 1, &store), "2024-01-05");
    assert_eq!(step_date("2024-01-04", 1, &DataStore::new()), "2024-01-04");
}

#[test]
fn bounds_follow_date_order() {
    let store = store_with(&["2024-01-02", "2024-01-05", "2024-01-07"]);
    assert_eq!(store.bounds(), Some(("2024-01-02", "2024-01-07")));
    assert_eq!(store_with(&[]).bounds(), None);
    assert_eq!(DataStore::new().bounds(), None);
}
