use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use crate::snapshot::Snapshot;

/// Write the snapshot twice: a timestamped archive copy that is never
/// overwritten, and `latest.json` which always is. Both get the same bytes.
pub fn persist_snapshot(
    snapshot: &Snapshot,
    dir: &Path,
    season: &str,
    week: u32,
) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let json = serde_json::to_string_pretty(snapshot).context("serialize snapshot")?;
    let stamp = Utc::now().format("%Y-%m-%dT%H%M%SZ");
    let archive = dir.join(format!("{season}-wk{week}-{stamp}.json"));
    let latest = dir.join("latest.json");

    fs::write(&archive, &json).with_context(|| format!("write {}", archive.display()))?;
    fs::write(&latest, &json).with_context(|| format!("write {}", latest.display()))?;

    Ok((archive, latest))
}
