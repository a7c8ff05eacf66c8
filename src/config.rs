use std::env;
use std::path::PathBuf;

pub const DEFAULT_LEAGUE_ID: &str = "1257451535101612032";
pub const DEFAULT_LEAGUE_NAME: &str = "The *ick Is In!";
pub const DEFAULT_SUMMARY_TEAM: &str = "Taylor Park Boys";

const DEFAULT_PAUSE_MS: u64 = 150;
const MAX_PAUSE_MS: u64 = 5_000;

/// Run configuration: env vars (`SLEEPER_*`) overridden by CLI flags.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub league_id: String,
    pub league_name: String,
    pub out_dir: PathBuf,
    pub players_cache: PathBuf,
    pub refresh_players: bool,
    pub pause_ms: u64,
    pub name_all_weeks: bool,
    pub full_index: bool,
    pub summary_team: String,
    pub summary_week: u32,
}

impl AppConfig {
    pub fn load(args: &[String]) -> Self {
        let league_id = arg_value(args, "--league-id")
            .or_else(|| env_string("SLEEPER_LEAGUE_ID"))
            .unwrap_or_else(|| DEFAULT_LEAGUE_ID.to_string());
        let league_name = arg_value(args, "--league-name")
            .or_else(|| env_string("SLEEPER_LEAGUE_NAME"))
            .unwrap_or_else(|| DEFAULT_LEAGUE_NAME.to_string());
        let out_dir = arg_value(args, "--out-dir")
            .or_else(|| env_string("SLEEPER_OUT_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/sleeper").join(league_slug(&league_name)));
        let players_cache = arg_value(args, "--players-cache")
            .or_else(|| env_string("SLEEPER_PLAYERS_CACHE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/sleeper/players/players-lite.json"));
        let pause_ms = arg_value(args, "--pause-ms")
            .and_then(|raw| raw.parse::<u64>().ok())
            .or_else(|| env_u64("SLEEPER_PAUSE_MS"))
            .unwrap_or(DEFAULT_PAUSE_MS)
            .min(MAX_PAUSE_MS);
        let summary_team = arg_value(args, "--summary-team")
            .or_else(|| env_string("SLEEPER_SUMMARY_TEAM"))
            .unwrap_or_else(|| DEFAULT_SUMMARY_TEAM.to_string());
        let summary_week = arg_value(args, "--summary-week")
            .and_then(|raw| raw.parse::<i64>().ok())
            .or_else(|| env_i64("SLEEPER_SUMMARY_WEEK"))
            .map(|week| week.max(1))
            .unwrap_or(1) as u32;

        Self {
            league_id,
            league_name,
            out_dir,
            players_cache,
            refresh_players: arg_flag(args, "--refresh-players")
                || env_bool("SLEEPER_REFRESH_PLAYERS", false),
            pause_ms,
            name_all_weeks: arg_flag(args, "--name-all-weeks")
                || env_bool("SLEEPER_NAME_ALL_WEEKS", false),
            full_index: arg_flag(args, "--full-index") || env_bool("SLEEPER_FULL_INDEX", false),
            summary_team,
            summary_week,
        }
    }
}

/// League name reduced to a filesystem-safe slug: every run of
/// non-alphanumeric characters collapses to a single `-`.
pub fn league_slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }
    out
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(rest) = arg.strip_prefix(name)
            && let Some(value) = rest.strip_prefix('=')
        {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
        {
            let trimmed = next.trim();
            if !trimmed.is_empty() && !trimmed.starts_with("--") {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

fn arg_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|raw| {
            let t = raw.trim().to_ascii_lowercase();
            !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
        })
        .unwrap_or(default)
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|raw| raw.trim().parse().ok())
}

fn env_i64(key: &str) -> Option<i64> {
    env::var(key).ok().and_then(|raw| raw.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::{arg_flag, arg_value, league_slug};

    #[test]
    fn slug_collapses_punctuation_runs() {
        assert_eq!(league_slug("The *ick Is In!"), "The-ick-Is-In");
        assert_eq!(league_slug("--already--dashed--"), "already-dashed");
        assert_eq!(league_slug("plain"), "plain");
    }

    #[test]
    fn slug_of_punctuation_only_is_empty() {
        assert_eq!(league_slug("***"), "");
    }

    #[test]
    fn arg_value_supports_both_spellings() {
        let args = vec!["--league-id=42".to_string()];
        assert_eq!(arg_value(&args, "--league-id").as_deref(), Some("42"));

        let args = vec!["--league-id".to_string(), "43".to_string()];
        assert_eq!(arg_value(&args, "--league-id").as_deref(), Some("43"));
    }

    #[test]
    fn arg_value_skips_adjacent_flags() {
        let args = vec!["--league-id".to_string(), "--refresh-players".to_string()];
        assert_eq!(arg_value(&args, "--league-id"), None);
        assert!(arg_flag(&args, "--refresh-players"));
    }
}
