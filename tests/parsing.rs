use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use sleeper_snapshot::players_index::slim_catalog;
use sleeper_snapshot::resolve::name_matchups;
use sleeper_snapshot::sleeper_api::parse_nfl_state;
use sleeper_snapshot::snapshot::{name_rosters, owner_names};
use sleeper_snapshot::summary::{find_summary_roster, summary_rows};

fn read_fixture(name: &str) -> Value {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    let raw = fs::read_to_string(path).expect("fixture file should be readable");
    serde_json::from_str(&raw).expect("fixture should be valid json")
}

#[test]
fn parses_nfl_state_fixture() {
    let state = parse_nfl_state(&read_fixture("nfl_state.json"));
    assert_eq!(state.season, "2025");
    assert_eq!(state.week, 3);
}

#[test]
fn slims_the_players_catalog_fixture() {
    let index = slim_catalog(&read_fixture("players_catalog.json"));
    assert_eq!(index.len(), 4);

    let mahomes = index.get("4046").expect("player kept");
    assert_eq!(mahomes.name.as_deref(), Some("Patrick Mahomes"));
    assert_eq!(mahomes.pos.as_deref(), Some("QB"));
    assert_eq!(mahomes.team.as_deref(), Some("KC"));
    assert_eq!(mahomes.status.as_deref(), Some("Active"));

    // full_name missing: falls back to first_name, then nothing.
    let taylor = index.get("9999").expect("player kept");
    assert_eq!(taylor.name.as_deref(), Some("Taylor"));
    assert_eq!(taylor.team, None);

    let kicker = index.get("1111").expect("player kept");
    assert_eq!(kicker.name, None);
    assert_eq!(kicker.pos.as_deref(), Some("K"));
}

#[test]
fn owner_names_fall_back_to_username() {
    let owners = owner_names(&read_fixture("users.json"));
    assert_eq!(owners.get("user-1").map(String::as_str), Some("mrldg"));
    assert_eq!(owners.get("user-2").map(String::as_str), Some("benchwarmer"));
    assert_eq!(owners.get("user-3").map(String::as_str), Some("Unknown"));
}

#[test]
fn names_rosters_from_fixtures() {
    let index = slim_catalog(&read_fixture("players_catalog.json"));
    let named = name_rosters(
        &read_fixture("rosters.json"),
        &read_fixture("users.json"),
        &index,
    );
    assert_eq!(named.len(), 3);

    let first = &named[0];
    assert_eq!(first.roster_id, Some(1));
    assert_eq!(first.owner_name, "mrldg");
    assert_eq!(first.record.as_deref(), Some("WWL"));
    assert_eq!(first.streak.as_deref(), Some("2W"));
    assert_eq!(first.waiver_position, Some(4));
    assert!((first.fpts - 312.44).abs() < 1e-9);
    assert!((first.fpts_against - 280.07).abs() < 1e-9);
    assert_eq!(first.players.len(), 3);
    assert_eq!(first.players[2].name, "SF D/ST");
    assert!(first.reserve.is_empty());

    let second = &named[1];
    assert_eq!(second.owner_name, "benchwarmer");
    assert!((second.fpts - 240.0).abs() < 1e-9);
    // Index entry with no name at all: the id stands in.
    assert_eq!(second.players[0].name, "1111");

    let third = &named[2];
    assert_eq!(third.owner_id, None);
    assert_eq!(third.owner_name, "Unknown");
    assert_eq!(third.record, None);
    assert_eq!(third.fpts, 0.0);
    assert!(third.players.is_empty());
}

#[test]
fn summary_roster_is_found_by_team_name() {
    let users = read_fixture("users.json");
    let rosters = read_fixture("rosters.json");

    assert_eq!(
        find_summary_roster(&users, &rosters, "Taylor Park Boys"),
        Some(1)
    );
    assert_eq!(
        find_summary_roster(&users, &rosters, "  taylor park boys  "),
        Some(1)
    );
    assert_eq!(find_summary_roster(&users, &rosters, "Bench Mob"), Some(2));
    assert_eq!(find_summary_roster(&users, &rosters, "No Such Team"), None);
}

#[test]
fn summary_rows_sort_by_points() {
    let index = slim_catalog(&read_fixture("players_catalog.json"));
    let named = name_matchups(Some(&read_fixture("matchups_week.json")), &index);
    let matchup = named
        .iter()
        .find(|m| m.roster_id == Some(1))
        .expect("roster 1 present");

    let (rows, total) = summary_rows(matchup);
    let names: Vec<&str> = rows.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Patrick Mahomes", "Justin Jefferson", "SF D/ST"]);
    assert!((rows[0].1 - 24.5).abs() < 1e-9);
    assert!((total - 55.34).abs() < 1e-9);
}
