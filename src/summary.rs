use std::cmp::Ordering;

use serde_json::Value;

use crate::resolve::{NamedMatchup, name_matchups};
use crate::snapshot::Snapshot;

// Roster known from an earlier snapshot; used when no team name matches.
const FALLBACK_ROSTER_ID: i64 = 10;

/// Print a player-by-player scoring table for one roster and week.
///
/// Purely observational: works off the already-built snapshot, never touches
/// the network, and a missing week or roster degrades to an informational
/// line instead of an error.
pub fn print_week_summary(snapshot: &Snapshot, week: u32, team_name: &str) {
    let roster_id = find_summary_roster(&snapshot.users, &snapshot.rosters, team_name)
        .unwrap_or(FALLBACK_ROSTER_ID);

    let named = named_matchups_for_week(snapshot, week);
    let Some(matchup) = named.iter().find(|m| m.roster_id == Some(roster_id)) else {
        println!("[SUMMARY] No week {week} data found for roster_id {roster_id}");
        return;
    };

    let (rows, total) = summary_rows(matchup);
    println!("=== Week {week} - {team_name} ===");
    for (name, points) in &rows {
        println!("{name:<28} {points:>6.2}");
    }
    println!("------------------------------------");
    println!("Team total (week {week}):    {total:.2}");
}

/// Map a team name (users[].metadata.team_name, case-insensitive) to its
/// roster id via the owner's user id.
pub fn find_summary_roster(users: &Value, rosters: &Value, team_name: &str) -> Option<i64> {
    let wanted = team_name.trim().to_lowercase();
    let owner_id = users.as_array()?.iter().find_map(|user| {
        let team = user.get("metadata")?.get("team_name")?.as_str()?;
        if team.trim().to_lowercase() == wanted {
            user.get("user_id")?.as_str().map(str::to_string)
        } else {
            None
        }
    })?;

    rosters.as_array()?.iter().find_map(|roster| {
        if roster.get("owner_id")?.as_str()? == owner_id {
            roster.get("roster_id")?.as_i64()
        } else {
            None
        }
    })
}

/// Starter rows (name, points) sorted by points descending, plus the total.
/// Falls back to the full player list when the starter list is empty.
pub fn summary_rows(matchup: &NamedMatchup) -> (Vec<(String, f64)>, f64) {
    let participants = if matchup.starters.is_empty() {
        &matchup.players
    } else {
        &matchup.starters
    };

    let mut rows = Vec::with_capacity(participants.len());
    let mut total = 0.0;
    for participant in participants {
        let points = matchup
            .players_points
            .get(&participant.id)
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        rows.push((participant.name.clone(), points));
        total += points;
    }
    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    (rows, total)
}

fn named_matchups_for_week(snapshot: &Snapshot, week: u32) -> Vec<NamedMatchup> {
    if week == snapshot.week {
        return snapshot.matchups_named.clone();
    }
    if let Some(named) = snapshot
        .matchups_by_week_named
        .as_ref()
        .and_then(|weeks| weeks.get(&week))
    {
        return named.clone();
    }
    name_matchups(
        snapshot.matchups_by_week.get(&week),
        &snapshot.players_index,
    )
}
