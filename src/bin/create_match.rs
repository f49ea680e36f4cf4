use scrim_stats::storage::Storage;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: create-match <team1> <team2> [grandfinals] [db-path]");
        return ExitCode::FAILURE;
    }
    let team1 = args[1].replace('_', " ");
    let team2 = args[2].replace('_', " ");
    let grandfinals = args.get(3).map(String::as_str) == Some("grandfinals");
    let db_path = args.get(4).map(String::as_str).unwrap_or("scrim-stats.db");

    let storage = match Storage::open(Path::new(db_path)) {
        Ok(storage) => storage,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    match storage.create_match(&team1, &team2, grandfinals) {
        Ok(match_id) => {
            println!("{match_id}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
