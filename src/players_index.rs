use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Slim catalog entry kept on disk. The upstream catalog record carries
/// dozens of fields; only these four are worth persisting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: Option<String>,
    pub pos: Option<String>,
    pub team: Option<String>,
    pub status: Option<String>,
}

pub type PlayersIndex = HashMap<String, PlayerRecord>;

/// Load the slim players index, fetching and projecting the full upstream
/// catalog only when the cache file is missing or a refresh is forced.
///
/// Staleness policy is presence-based: an existing file is returned as-is.
/// A failed fetch propagates without writing a partial cache.
pub fn get_players_index(
    path: &Path,
    force_refresh: bool,
    fetch_catalog: impl FnOnce() -> Result<Value>,
) -> Result<PlayersIndex> {
    if !force_refresh && path.exists() {
        return load_index(path);
    }

    println!("[INFO] Downloading players catalog...");
    let catalog = fetch_catalog().context("fetch players catalog")?;
    let index = slim_catalog(&catalog);
    save_index(path, &index)?;
    Ok(index)
}

/// Project the raw id -> record catalog down to `PlayerRecord` fields.
/// Names fall back from `full_name` to `first_name`.
pub fn slim_catalog(catalog: &Value) -> PlayersIndex {
    let Some(entries) = catalog.as_object() else {
        return PlayersIndex::new();
    };

    let mut index = PlayersIndex::with_capacity(entries.len());
    for (id, data) in entries {
        index.insert(
            id.clone(),
            PlayerRecord {
                name: non_empty_string(data.get("full_name"))
                    .or_else(|| non_empty_string(data.get("first_name"))),
                pos: non_empty_string(data.get("position")),
                team: non_empty_string(data.get("team")),
                status: non_empty_string(data.get("status")),
            },
        );
    }
    index
}

pub fn load_index(path: &Path) -> Result<PlayersIndex> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read players index {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse players index {}", path.display()))
}

pub fn save_index(path: &Path, index: &PlayersIndex) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let json = serde_json::to_string(index).context("serialize players index")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write players index {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap players index {}", path.display()))?;
    Ok(())
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use anyhow::anyhow;
    use serde_json::json;

    use super::{get_players_index, slim_catalog};

    fn sample_catalog() -> serde_json::Value {
        json!({
            "100": {
                "full_name": "Jordan Doe",
                "first_name": "Jordan",
                "position": "RB",
                "team": "KC",
                "status": "Active",
                "injury_status": "Questionable",
                "weight": "212"
            },
            "101": {
                "first_name": "Sam",
                "position": "QB",
                "team": null,
                "status": "Inactive"
            }
        })
    }

    #[test]
    fn slim_keeps_only_index_fields() {
        let index = slim_catalog(&sample_catalog());
        let rec = index.get("100").expect("player kept");
        assert_eq!(rec.name.as_deref(), Some("Jordan Doe"));
        assert_eq!(rec.pos.as_deref(), Some("RB"));
        assert_eq!(rec.team.as_deref(), Some("KC"));
        assert_eq!(rec.status.as_deref(), Some("Active"));
    }

    #[test]
    fn slim_name_falls_back_to_first_name() {
        let index = slim_catalog(&sample_catalog());
        let rec = index.get("101").expect("player kept");
        assert_eq!(rec.name.as_deref(), Some("Sam"));
        assert_eq!(rec.team, None);
    }

    #[test]
    fn second_build_reuses_cache_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("players-lite.json");
        let calls = Cell::new(0u32);

        let fetch = || {
            calls.set(calls.get() + 1);
            Ok(sample_catalog())
        };
        let first = get_players_index(&path, false, fetch).expect("first build");

        let second = get_players_index(&path, false, || {
            calls.set(calls.get() + 1);
            Ok(sample_catalog())
        })
        .expect("second build");

        assert_eq!(calls.get(), 1, "upstream fetched exactly once");
        assert_eq!(first, second);
    }

    #[test]
    fn force_refresh_refetches() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("players-lite.json");

        get_players_index(&path, false, || Ok(sample_catalog())).expect("first build");
        let refreshed = get_players_index(&path, true, || {
            Ok(json!({"200": {"full_name": "New Guy", "position": "WR"}}))
        })
        .expect("refresh");

        assert!(refreshed.contains_key("200"));
        assert!(!refreshed.contains_key("100"));
    }

    #[test]
    fn failed_fetch_leaves_no_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("players-lite.json");

        let err = get_players_index(&path, false, || Err(anyhow!("catalog down")));
        assert!(err.is_err());
        assert!(!path.exists());
    }
}
