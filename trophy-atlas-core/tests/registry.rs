use trophy_atlas_core::registry::{PlaytimeRegistry, RawPlaytimeRecord};

fn record(name: &str, seconds: f64) -> RawPlaytimeRecord {
    RawPlaytimeRecord {
        name: name.to_string(),
        seconds,
    }
}

#[test]
fn max_merge_keeps_largest_duration() {
    let registry = PlaytimeRegistry::build([
        record("Bloodborne", 100.0),
        record("Bloodborne\u{2122}", 300.0),
    ]);
    assert_eq!(registry.lookup("bloodborne"), 300.0);
    assert_eq!(registry.lifetime_seconds(), 400.0);
    assert_eq!(registry.len(), 1);
}

#[test]
fn zero_duration_records_are_skipped_entirely() {
    let registry = PlaytimeRegistry::build([record("Bloodborne", 0.0)]);
    assert_eq!(registry.lookup("bloodborne"), 0.0);
    assert_eq!(registry.lifetime_seconds(), 0.0);
    assert!(registry.is_empty());
}

#[test]
fn empty_key_counts_toward_lifetime_but_not_matching() {
    let registry = PlaytimeRegistry::build([record("!!!", 500.0), record("Tetris", 100.0)]);
    assert_eq!(registry.lifetime_seconds(), 600.0);
    assert_eq!(registry.len(), 1);
    // An empty key must never be a valid match target.
    assert_eq!(registry.lookup(""), 0.0);
}

#[test]
fn unknown_key_defaults_to_zero() {
    let registry = PlaytimeRegistry::build([record("Tetris", 100.0)]);
    assert_eq!(registry.lookup("celeste"), 0.0);
}

#[test]
fn lifetime_total_sums_across_distinct_keys() {
    let registry = PlaytimeRegistry::build([
        record("A Game", 10.0),
        record("Another Game", 20.0),
        record("A Game", 5.0),
    ]);
    assert_eq!(registry.lifetime_seconds(), 35.0);
    assert_eq!(registry.lookup("a game"), 10.0);
}
