use scrim_stats::config::HEROES;
use scrim_stats::error::Result;
use scrim_stats::leaderboards::{
    GENERAL_LEADERBOARD_FILE, HERO_LEADERBOARD_FILE, build_general_leaderboards,
    build_hero_leaderboards, save_artifact,
};
use scrim_stats::storage::Storage;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    let db_path = args.get(1).map(String::as_str).unwrap_or("scrim-stats.db");
    let out_dir = args.get(2).map(String::as_str).unwrap_or(".");

    match rebuild(Path::new(db_path), Path::new(out_dir)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Rebuild both artifacts wholesale. A failure leaves whatever was on disk
/// untouched rather than writing a partial ranking.
fn rebuild(db_path: &Path, out_dir: &Path) -> Result<()> {
    let storage = Storage::open(db_path)?;

    let general = build_general_leaderboards(&storage)?;
    let heroes = build_hero_leaderboards(&storage, HEROES)?;

    save_artifact(&general, &out_dir.join(GENERAL_LEADERBOARD_FILE))?;
    save_artifact(&heroes, &out_dir.join(HERO_LEADERBOARD_FILE))?;
    info!("leaderboards updated");
    Ok(())
}
