use trophy_atlas_core::ghost::{DEFAULT_GHOST_THRESHOLD_SECONDS, filter_ghost_playtime};
use trophy_atlas_core::reconcile::{PipelineOptions, RawTrophyRecord, ReconciliationEngine};
use trophy_atlas_core::registry::{PlaytimeRegistry, RawPlaytimeRecord};
use trophy_atlas_core::runlog::RunLog;
use trophy_atlas_core::snapshot::assemble_snapshot;
use trophy_atlas_core::trophies::TierCounts;

fn playtime(name: &str, seconds: f64) -> RawPlaytimeRecord {
    RawPlaytimeRecord {
        name: name.to_string(),
        seconds,
    }
}

fn trophy(name: &str, platform: &str, earned: TierCounts, defined: TierCounts) -> RawTrophyRecord {
    RawTrophyRecord {
        name: name.to_string(),
        platform: platform.to_string(),
        earned,
        defined,
    }
}

fn run(
    registry: &PlaytimeRegistry,
    records: Vec<RawTrophyRecord>,
) -> (Vec<trophy_atlas_core::LibraryEntry>, RunLog) {
    let mut log = RunLog::new();
    let mut engine = ReconciliationEngine::new(registry, PipelineOptions::default());
    for record in records {
        engine.ingest(record, &mut log);
    }
    (engine.finish(), log)
}

#[test]
fn ghost_threshold_is_exclusive() {
    assert_eq!(filter_ghost_playtime(54_001.0, 0, DEFAULT_GHOST_THRESHOLD_SECONDS), 0.0);
    assert_eq!(
        filter_ghost_playtime(54_001.0, 1, DEFAULT_GHOST_THRESHOLD_SECONDS),
        54_001.0
    );
    assert_eq!(
        filter_ghost_playtime(54_000.0, 0, DEFAULT_GHOST_THRESHOLD_SECONDS),
        54_000.0
    );
}

#[test]
fn ghost_playtime_zeroed_at_merge_time() {
    let registry = PlaytimeRegistry::build([playtime("Idle Collector", 200_000.0)]);
    let (entries, log) = run(
        &registry,
        vec![trophy(
            "Idle Collector",
            "PS5",
            TierCounts::default(),
            TierCounts::new(10, 5, 2, 1),
        )],
    );

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].playtime.seconds, 0.0);
    assert_eq!(entries[0].playtime.formatted, "0h 0m");
    assert_eq!(log.summary().ghosts_zeroed, 1);

    // The lifetime total is computed upstream and stays unfiltered.
    assert_eq!(registry.lifetime_seconds(), 200_000.0);
}

#[test]
fn earned_trophy_spares_high_playtime() {
    let registry = PlaytimeRegistry::build([playtime("Long Haul", 200_000.0)]);
    let (entries, log) = run(
        &registry,
        vec![trophy(
            "Long Haul",
            "PS5",
            TierCounts::new(1, 0, 0, 0),
            TierCounts::new(10, 5, 2, 1),
        )],
    );

    assert_eq!(entries[0].playtime.seconds, 200_000.0);
    assert_eq!(log.summary().ghosts_zeroed, 0);
}

#[test]
fn higher_progress_replaces_regardless_of_arrival_order() {
    let registry = PlaytimeRegistry::default();
    let low = trophy(
        "Celeste",
        "PS4",
        TierCounts::new(1, 0, 0, 0),
        TierCounts::new(3, 0, 0, 0),
    );
    let high = trophy(
        "Celeste",
        "PS4",
        TierCounts::new(2, 0, 0, 0),
        TierCounts::new(3, 0, 0, 0),
    );

    for records in [vec![low.clone(), high.clone()], vec![high, low]] {
        let (entries, _) = run(&registry, records);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].trophies.progress, "66.7%");
    }
}

#[test]
fn lower_progress_never_replaces() {
    let registry = PlaytimeRegistry::default();
    let (entries, log) = run(
        &registry,
        vec![
            trophy(
                "Celeste",
                "PS4",
                TierCounts::new(2, 0, 0, 0),
                TierCounts::new(3, 0, 0, 0),
            ),
            trophy(
                "Celeste",
                "PS4",
                TierCounts::new(1, 0, 0, 0),
                TierCounts::new(3, 0, 0, 0),
            ),
        ],
    );

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].trophies.progress, "66.7%");
    assert_eq!(log.summary().duplicates_dropped, 1);
    assert_eq!(log.summary().duplicates_replaced, 0);
}

#[test]
fn platforms_are_never_cross_merged() {
    let registry = PlaytimeRegistry::default();
    let earned = TierCounts::new(5, 2, 1, 0);
    let defined = TierCounts::new(20, 10, 4, 1);
    let (entries, _) = run(
        &registry,
        vec![
            trophy("Hades", "PS5", earned, defined),
            trophy("Hades", "PS4", earned, defined),
        ],
    );

    assert_eq!(entries.len(), 2);
    let snapshot = assemble_snapshot("tester", 0.0, entries);
    assert_eq!(snapshot.metadata.total_games_unique, 2);
}

#[test]
fn empty_key_titles_fall_back_to_raw_title() {
    let registry = PlaytimeRegistry::default();
    let defined = TierCounts::new(3, 0, 0, 0);
    let (entries, log) = run(
        &registry,
        vec![
            trophy("!!!", "PS4", TierCounts::default(), defined),
            trophy("???", "PS4", TierCounts::default(), defined),
        ],
    );

    // Two distinct unusable titles must not collide under one empty bucket.
    assert_eq!(entries.len(), 2);
    assert_eq!(log.summary().empty_key_fallbacks, 2);
}

#[test]
fn snapshot_partitions_and_sorts() {
    let registry = PlaytimeRegistry::build([playtime("Bloodborne", 3_600.0)]);
    let (entries, _) = run(
        &registry,
        vec![
            trophy(
                "Bloodborne",
                "PS4",
                TierCounts::new(20, 10, 8, 1),
                TierCounts::new(21, 10, 8, 1),
            ),
            trophy(
                "Astro Bot",
                "PS5",
                TierCounts::new(3, 1, 0, 0),
                TierCounts::new(30, 12, 3, 1),
            ),
        ],
    );

    let snapshot = assemble_snapshot("tester", registry.lifetime_seconds(), entries);

    assert_eq!(snapshot.metadata.user, "tester");
    assert_eq!(snapshot.metadata.total_games_unique, 2);
    assert_eq!(snapshot.metadata.total_platinums, 1);
    assert_eq!(snapshot.metadata.total_playtime_seconds, 3_600.0);
    assert_eq!(snapshot.metadata.total_playtime_formatted, "1h 0m");

    let titles: Vec<&str> = snapshot.full_library.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Astro Bot", "Bloodborne"]);

    assert_eq!(snapshot.platinum_collection.len(), 1);
    assert_eq!(snapshot.platinum_collection[0].title, "Bloodborne");
    assert!(snapshot.platinum_collection[0].is_platinum_earned);
}

#[test]
fn matched_playtime_flows_into_entry() {
    let registry = PlaytimeRegistry::build([playtime("Gran Turismo\u{ae} 7", 7_200.0)]);
    let (entries, _) = run(
        &registry,
        vec![trophy(
            "Gran Turismo 7",
            "PS5",
            TierCounts::new(10, 4, 1, 0),
            TierCounts::new(30, 15, 5, 1),
        )],
    );

    assert_eq!(entries[0].playtime.seconds, 7_200.0);
    assert_eq!(entries[0].playtime.hours, 2.0);
    assert_eq!(entries[0].playtime.formatted, "2h 0m");
}
