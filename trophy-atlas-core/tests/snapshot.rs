use trophy_atlas_core::snapshot::{
    LibraryEntry, PlaytimeBlock, TrophyBlock, TrophyBreakdown, assemble_snapshot,
};

fn entry(title: &str, platinum: bool) -> LibraryEntry {
    LibraryEntry {
        title: title.to_string(),
        platform: "PS5".to_string(),
        is_platinum_earned: platinum,
        playtime: PlaytimeBlock::from_seconds(5_430.0),
        trophies: TrophyBlock {
            progress: "33.3%".to_string(),
            breakdown: TrophyBreakdown {
                plat: u32::from(platinum),
                gold: 2,
                silver: 5,
                bronze: 10,
            },
        },
        progress_percent: 33.3,
    }
}

#[test]
fn serialized_document_matches_consumer_contract() {
    let snapshot = assemble_snapshot("wolf", 9_000.0, vec![entry("Zeta", false), entry("Alpha", true)]);
    let json = serde_json::to_value(&snapshot).expect("snapshot serializes");

    let metadata = &json["metadata"];
    assert_eq!(metadata["user"], "wolf");
    assert_eq!(metadata["total_playtime_seconds"], 9_000.0);
    assert_eq!(metadata["total_playtime_formatted"], "2h 30m");
    assert_eq!(metadata["total_platinums"], 1);
    assert_eq!(metadata["total_games_unique"], 2);

    let library = json["full_library"].as_array().expect("full_library array");
    assert_eq!(library.len(), 2);
    assert_eq!(library[0]["title"], "Alpha");
    assert_eq!(library[1]["title"], "Zeta");

    let first = &library[0];
    assert_eq!(first["platform"], "PS5");
    assert_eq!(first["is_platinum_earned"], true);
    assert_eq!(first["playtime"]["seconds"], 5_430.0);
    assert_eq!(first["playtime"]["hours"], 1.51);
    assert_eq!(first["playtime"]["formatted"], "1h 30m");
    assert_eq!(first["trophies"]["progress"], "33.3%");
    assert_eq!(first["trophies"]["breakdown"]["plat"], 1);
    assert_eq!(first["trophies"]["breakdown"]["bronze"], 10);

    // The numeric tie-breaking value must be stripped from the output.
    assert!(first.get("progress_percent").is_none());
    assert!(first["trophies"].get("progress_float").is_none());

    assert_eq!(json["platinum_collection"].as_array().unwrap().len(), 1);
}

#[test]
fn playtime_block_rounds_to_two_decimals() {
    let block = PlaytimeBlock::from_seconds(3_661.237);
    assert_eq!(block.seconds, 3_661.24);
    assert_eq!(block.hours, 1.02);
    assert_eq!(block.formatted, "1h 1m");
}
