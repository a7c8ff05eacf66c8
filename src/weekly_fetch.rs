use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::Value;

/// Per-week results collected into an ordered map, plus the warnings for the
/// weeks that failed. Callers surface the warnings once at the end of the run
/// instead of interleaving them with fetching.
#[derive(Debug, Default)]
pub struct WeeklyFetch {
    pub weeks: BTreeMap<u32, Value>,
    pub warnings: Vec<String>,
}

/// Fetch weeks 1..=upper_week through `fetch`, absorbing per-week failures.
///
/// A failed week degrades to an empty array so sibling weeks survive;
/// `upper_week` is coerced to at least 1.
pub fn fetch_by_week(
    kind: &str,
    upper_week: i64,
    mut fetch: impl FnMut(u32) -> Result<Value>,
) -> WeeklyFetch {
    let upper = upper_week.max(1) as u32;
    let mut out = WeeklyFetch::default();
    for week in 1..=upper {
        match fetch(week) {
            Ok(value) => {
                out.weeks.insert(week, value);
            }
            Err(err) => {
                out.warnings.push(format!("{kind} week {week}: {err:#}"));
                out.weeks.insert(week, Value::Array(Vec::new()));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use serde_json::json;

    use super::fetch_by_week;

    #[test]
    fn failing_week_keeps_siblings() {
        let out = fetch_by_week("matchups", 3, |week| {
            if week == 2 {
                Err(anyhow!("http 500"))
            } else {
                Ok(json!([{"week": week}]))
            }
        });

        assert_eq!(out.weeks.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(out.weeks[&2], json!([]));
        assert_eq!(out.weeks[&1], json!([{"week": 1}]));
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("week 2"));
    }

    #[test]
    fn non_positive_upper_week_behaves_as_one() {
        for upper in [0, -5] {
            let out = fetch_by_week("transactions", upper, |week| Ok(json!([week])));
            assert_eq!(out.weeks.keys().copied().collect::<Vec<_>>(), vec![1]);
            assert!(out.warnings.is_empty());
        }
    }

    #[test]
    fn weeks_stay_in_numeric_order() {
        let out = fetch_by_week("matchups", 12, |_| Ok(json!([])));
        let keys = out.weeks.keys().copied().collect::<Vec<_>>();
        assert_eq!(keys, (1..=12).collect::<Vec<_>>());
    }
}
