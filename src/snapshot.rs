use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::players_index::{self, PlayersIndex};
use crate::resolve::{
    NamedMatchup, ResolvedParticipant, is_team_defense_code, name_matchups, resolve_ids,
};
use crate::sleeper_api::{SleeperApi, parse_nfl_state};
use crate::weekly_fetch::fetch_by_week;

/// The composite document one run produces. Built fresh every run and never
/// merged with prior snapshots.
#[derive(Debug, Default, Serialize)]
pub struct Snapshot {
    pub fetched_at: String,
    pub season: String,
    pub week: u32,
    pub league: LeagueSection,
    pub users: Value,
    pub rosters: Value,
    pub rosters_named: Vec<NamedRoster>,
    pub matchups: Value,
    pub matchups_named: Vec<NamedMatchup>,
    pub matchups_by_week: BTreeMap<u32, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matchups_by_week_named: Option<BTreeMap<u32, Vec<NamedMatchup>>>,
    pub transactions_by_week: BTreeMap<u32, Value>,
    pub draft_package: DraftPackage,
    pub traded_picks: Value,
    pub players_index: PlayersIndex,
}

#[derive(Debug, Default, Serialize)]
pub struct LeagueSection {
    pub league_id: String,
    pub name: String,
    pub sleeper_league_obj: Value,
}

#[derive(Debug, Default, Serialize)]
pub struct DraftPackage {
    pub drafts: Value,
    pub picks_by_draft: BTreeMap<String, Value>,
    pub traded_picks_by_draft: BTreeMap<String, Value>,
}

/// One roster with its owner and identifier lists made readable.
#[derive(Debug, Clone, Serialize)]
pub struct NamedRoster {
    pub roster_id: Option<i64>,
    pub owner_id: Option<String>,
    pub owner_name: String,
    pub record: Option<String>,
    pub streak: Option<String>,
    pub waiver_position: Option<i64>,
    pub fpts: f64,
    pub fpts_against: f64,
    pub players: Vec<ResolvedParticipant>,
    pub starters: Vec<ResolvedParticipant>,
    pub reserve: Vec<ResolvedParticipant>,
}

pub struct AssembleOutcome {
    pub snapshot: Snapshot,
    pub warnings: Vec<String>,
}

/// Fetch everything and compose one snapshot.
///
/// State, league, users and rosters are required; their failures abort the
/// run. Weekly and draft fetches degrade to empty values and land in
/// `warnings` for one end-of-run replay.
pub fn assemble(api: &SleeperApi, cfg: &AppConfig) -> Result<AssembleOutcome> {
    let state_raw = api.nfl_state().context("fetch nfl state")?;
    let state = parse_nfl_state(&state_raw);
    println!("[INFO] Season {} week {}", state.season, state.week);

    let league = api.league().context("fetch league")?;
    let users = api.users().context("fetch users")?;
    let rosters = api.rosters().context("fetch rosters")?;

    let mut warnings = Vec::new();

    let mut matchup_weeks = fetch_by_week("matchups", i64::from(state.week), |week| {
        api.matchups(week)
    });
    warnings.append(&mut matchup_weeks.warnings);

    let mut transaction_weeks = fetch_by_week("transactions", i64::from(state.week), |week| {
        api.transactions(week)
    });
    warnings.append(&mut transaction_weeks.warnings);

    let draft_package = fetch_draft_package(api, &mut warnings);

    let traded_picks = match api.traded_picks() {
        Ok(value) => value,
        Err(err) => {
            warnings.push(format!("traded picks: {err:#}"));
            Value::Array(Vec::new())
        }
    };

    let index = players_index::get_players_index(&cfg.players_cache, cfg.refresh_players, || {
        api.players_catalog()
    })
    .context("build players index")?;

    // Named views always resolve against the full index; narrowing below only
    // shrinks what the document carries.
    let rosters_named = name_rosters(&rosters, &users, &index);
    let matchups_current = matchup_weeks
        .weeks
        .get(&state.week)
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()));
    let matchups_named = name_matchups(Some(&matchups_current), &index);

    let matchups_by_week_named = cfg.name_all_weeks.then(|| {
        matchup_weeks
            .weeks
            .iter()
            .map(|(week, raw)| (*week, name_matchups(Some(raw), &index)))
            .collect::<BTreeMap<_, _>>()
    });

    let index_for_doc = if cfg.full_index {
        index
    } else {
        let referenced = referenced_player_ids(&rosters, &matchup_weeks.weeks);
        narrow_players_index(&index, &referenced)
    };

    let snapshot = Snapshot {
        fetched_at: Utc::now().to_rfc3339(),
        season: state.season.clone(),
        week: state.week,
        league: LeagueSection {
            league_id: api.league_id().to_string(),
            name: cfg.league_name.clone(),
            sleeper_league_obj: league,
        },
        users,
        rosters,
        rosters_named,
        matchups: matchups_current,
        matchups_named,
        matchups_by_week: matchup_weeks.weeks,
        matchups_by_week_named,
        transactions_by_week: transaction_weeks.weeks,
        draft_package,
        traded_picks,
        players_index: index_for_doc,
    };

    Ok(AssembleOutcome { snapshot, warnings })
}

fn fetch_draft_package(api: &SleeperApi, warnings: &mut Vec<String>) -> DraftPackage {
    let drafts = match api.drafts() {
        Ok(value) => value,
        Err(err) => {
            warnings.push(format!("drafts: {err:#}"));
            Value::Array(Vec::new())
        }
    };

    let mut package = DraftPackage {
        drafts: drafts.clone(),
        ..DraftPackage::default()
    };
    let Some(list) = drafts.as_array() else {
        return package;
    };

    for draft in list {
        let Some(draft_id) = draft.get("draft_id").and_then(Value::as_str) else {
            continue;
        };
        let picks = match api.draft_picks(draft_id) {
            Ok(value) => value,
            Err(err) => {
                warnings.push(format!("draft {draft_id} picks: {err:#}"));
                Value::Array(Vec::new())
            }
        };
        package.picks_by_draft.insert(draft_id.to_string(), picks);

        let traded = match api.draft_traded_picks(draft_id) {
            Ok(value) => value,
            Err(err) => {
                warnings.push(format!("draft {draft_id} traded picks: {err:#}"));
                Value::Array(Vec::new())
            }
        };
        package
            .traded_picks_by_draft
            .insert(draft_id.to_string(), traded);
    }

    package
}

/// Owner display names keyed by user id; display name falls back to username.
pub fn owner_names(users: &Value) -> HashMap<String, String> {
    let Some(list) = users.as_array() else {
        return HashMap::new();
    };
    let mut owners = HashMap::with_capacity(list.len());
    for user in list {
        let Some(user_id) = user.get("user_id").and_then(Value::as_str) else {
            continue;
        };
        let name = user
            .get("display_name")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                user.get("username")
                    .and_then(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
            })
            .unwrap_or("Unknown");
        owners.insert(user_id.to_string(), name.to_string());
    }
    owners
}

/// Resolve each raw roster into a `NamedRoster` with readable owner and
/// player entries.
pub fn name_rosters(rosters: &Value, users: &Value, index: &PlayersIndex) -> Vec<NamedRoster> {
    let Some(list) = rosters.as_array() else {
        return Vec::new();
    };
    let owners = owner_names(users);

    list.iter()
        .map(|roster| {
            let owner_id = roster
                .get("owner_id")
                .and_then(Value::as_str)
                .map(str::to_string);
            let owner_name = owner_id
                .as_deref()
                .and_then(|id| owners.get(id))
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string());
            let settings = roster.get("settings").unwrap_or(&Value::Null);
            let metadata = roster.get("metadata").unwrap_or(&Value::Null);

            NamedRoster {
                roster_id: roster.get("roster_id").and_then(Value::as_i64),
                owner_id,
                owner_name,
                record: metadata
                    .get("record")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                streak: metadata
                    .get("streak")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                waiver_position: settings.get("waiver_position").and_then(Value::as_i64),
                fpts: combine_points(settings, "fpts", "fpts_decimal"),
                fpts_against: combine_points(settings, "fpts_against", "fpts_against_decimal"),
                players: resolve_ids(roster.get("players"), index),
                starters: resolve_ids(roster.get("starters"), index),
                reserve: resolve_ids(roster.get("reserve"), index),
            }
        })
        .collect()
}

// Sleeper splits point totals into an integer part and a two-digit decimal.
fn combine_points(settings: &Value, whole_key: &str, decimal_key: &str) -> f64 {
    let whole = settings.get(whole_key).and_then(Value::as_f64).unwrap_or(0.0);
    let decimal = settings
        .get(decimal_key)
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    whole + decimal / 100.0
}

/// Identifiers this league actually references: roster player lists plus
/// every fetched week's starter/player lists and point-breakdown keys.
/// Defense codes are excluded; they are never catalog entries.
pub fn referenced_player_ids(
    rosters: &Value,
    matchup_weeks: &BTreeMap<u32, Value>,
) -> HashSet<String> {
    let mut ids = HashSet::new();

    if let Some(list) = rosters.as_array() {
        for roster in list {
            for key in ["players", "starters", "reserve"] {
                collect_ids(roster.get(key), &mut ids);
            }
        }
    }

    for raw in matchup_weeks.values() {
        let Some(list) = raw.as_array() else {
            continue;
        };
        for matchup in list {
            collect_ids(matchup.get("starters"), &mut ids);
            collect_ids(matchup.get("players"), &mut ids);
            if let Some(points) = matchup.get("players_points").and_then(Value::as_object) {
                for id in points.keys() {
                    insert_player_id(id, &mut ids);
                }
            }
        }
    }

    ids
}

pub fn narrow_players_index(index: &PlayersIndex, referenced: &HashSet<String>) -> PlayersIndex {
    index
        .iter()
        .filter(|(id, _)| referenced.contains(*id))
        .map(|(id, rec)| (id.clone(), rec.clone()))
        .collect()
}

fn collect_ids(list: Option<&Value>, ids: &mut HashSet<String>) {
    let Some(list) = list.and_then(Value::as_array) else {
        return;
    };
    for raw in list {
        match raw {
            Value::String(s) => insert_player_id(s, ids),
            Value::Number(n) => {
                ids.insert(n.to_string());
            }
            _ => {}
        }
    }
}

fn insert_player_id(id: &str, ids: &mut HashSet<String>) {
    if !is_team_defense_code(id) {
        ids.insert(id.to_string());
    }
}
