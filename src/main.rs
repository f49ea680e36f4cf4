use scrim_stats::config::MatchConfig;
use scrim_stats::error::Result;
use scrim_stats::log_reader::read_match_log;
use scrim_stats::stat_collection::collect_match_stats;
use scrim_stats::storage::Storage;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

const DEFAULT_DB_PATH: &str = "scrim-stats.db";

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 5 {
        eprintln!("usage: scrim-stats <log-file> <match-id> <map-name> <winner> [db-path]");
        return ExitCode::FAILURE;
    }

    let match_id: i64 = match args[2].parse() {
        Ok(id) => id,
        Err(_) => {
            eprintln!("match id must be a number, got {}", args[2]);
            return ExitCode::FAILURE;
        }
    };
    // underscores stand in for spaces on the command line
    let map_name = args[3].replace('_', " ");
    let winner = args[4].replace('_', " ");
    let db_path = args.get(5).map(String::as_str).unwrap_or(DEFAULT_DB_PATH);

    match ingest(Path::new(&args[1]), match_id, &map_name, &winner, Path::new(db_path)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn ingest(
    log_path: &Path,
    match_id: i64,
    map_name: &str,
    winner: &str,
    db_path: &Path,
) -> Result<()> {
    let lines = read_match_log(log_path)?;
    let stats = collect_match_stats(&lines, &MatchConfig::default())?;
    let storage = Storage::open(db_path)?;
    let map_id = storage.save_match_stats(match_id, map_name, winner, &stats)?;
    info!(
        map_id,
        duration_secs = stats.duration_secs,
        players = stats.players.len(),
        "match log ingested"
    );
    Ok(())
}
