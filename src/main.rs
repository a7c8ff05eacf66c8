use anyhow::Result;

use sleeper_snapshot::config::AppConfig;
use sleeper_snapshot::persist::persist_snapshot;
use sleeper_snapshot::sleeper_api::SleeperApi;
use sleeper_snapshot::snapshot;
use sleeper_snapshot::summary::print_week_summary;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = AppConfig::load(&args);
    println!("[INFO] League {} ({})", cfg.league_name, cfg.league_id);

    let api = SleeperApi::new(cfg.league_id.clone(), cfg.pause_ms);
    let outcome = snapshot::assemble(&api, &cfg)?;

    let (archive, latest) = persist_snapshot(
        &outcome.snapshot,
        &cfg.out_dir,
        &outcome.snapshot.season,
        outcome.snapshot.week,
    )?;
    println!("[WRITE] {} and {}", latest.display(), archive.display());

    for warning in &outcome.warnings {
        println!("[WARN] {warning}");
    }

    print_week_summary(&outcome.snapshot, cfg.summary_week, &cfg.summary_team);

    Ok(())
}
