use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::players_index::PlayersIndex;

/// A raw identifier turned into something readable. `id` is always the
/// stringified input; `name` falls back to the id when nothing better exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedParticipant {
    pub id: String,
    pub name: String,
    pub pos: Option<String>,
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// One matchup row with its identifier lists resolved. `players_points`
/// passes through structurally unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct NamedMatchup {
    pub matchup_id: Option<i64>,
    pub roster_id: Option<i64>,
    pub points: f64,
    pub starters: Vec<ResolvedParticipant>,
    pub players: Vec<ResolvedParticipant>,
    pub players_points: Value,
}

/// Classification rule for team-defense units: a purely alphabetic code of
/// length 2-3 ("SF", "PHI"). These never appear in the players catalog.
/// Nothing upstream guarantees a real player id can't collide with this
/// shape; it is a known approximation carried over from the data source.
pub fn is_team_defense_code(raw: &str) -> bool {
    (2..=3).contains(&raw.len()) && raw.chars().all(|ch| ch.is_ascii_alphabetic())
}

/// Resolve a raw identifier list (players and/or defense codes) against the
/// slim index. Order and duplicates are preserved; `None` or a non-array
/// yields an empty vec.
pub fn resolve_ids(ids: Option<&Value>, index: &PlayersIndex) -> Vec<ResolvedParticipant> {
    let Some(list) = ids.and_then(Value::as_array) else {
        return Vec::new();
    };
    list.iter().map(|raw| resolve_one(raw, index)).collect()
}

fn resolve_one(raw: &Value, index: &PlayersIndex) -> ResolvedParticipant {
    let id = id_to_string(raw);
    if raw.is_string() && is_team_defense_code(&id) {
        return ResolvedParticipant {
            id: id.clone(),
            name: format!("{id} D/ST"),
            pos: Some("DEF".to_string()),
            team: Some(id),
            status: None,
        };
    }

    match index.get(&id) {
        Some(rec) => ResolvedParticipant {
            name: rec
                .name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| id.clone()),
            pos: rec.pos.clone(),
            team: rec.team.clone(),
            status: rec.status.clone(),
            id,
        },
        None => ResolvedParticipant {
            name: id.clone(),
            pos: None,
            team: None,
            status: None,
            id,
        },
    }
}

/// Attach resolved starter/player lists to each raw matchup row.
pub fn name_matchups(raw_matchups: Option<&Value>, index: &PlayersIndex) -> Vec<NamedMatchup> {
    let Some(list) = raw_matchups.and_then(Value::as_array) else {
        return Vec::new();
    };
    list.iter()
        .map(|m| NamedMatchup {
            matchup_id: m.get("matchup_id").and_then(Value::as_i64),
            roster_id: m.get("roster_id").and_then(Value::as_i64),
            points: m.get("points").and_then(Value::as_f64).unwrap_or(0.0),
            starters: resolve_ids(m.get("starters"), index),
            players: resolve_ids(m.get("players"), index),
            players_points: m
                .get("players_points")
                .cloned()
                .unwrap_or_else(|| Value::Object(Default::default())),
        })
        .collect()
}

fn id_to_string(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
