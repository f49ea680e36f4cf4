use num_traits::FromPrimitive;
use scrim_stats::config::{HEROES, canonical_hero_name};
use scrim_stats::error::Result;
use scrim_stats::leaderboards::{
    GENERAL_LEADERBOARD_FILE, HERO_LEADERBOARD_FILE, Leaderboard, leaderboard_ranks,
    load_general_artifact, load_hero_artifact,
};
use scrim_stats::profile::{PlayerProfile, player_hero_profile, player_profile};
use scrim_stats::stats::StatCategory;
use scrim_stats::storage::Storage;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: player-stats <player> [hero] [db-path]");
        return ExitCode::FAILURE;
    }
    let player = args[1].to_lowercase();
    let hero = args.get(2).map(|h| canonical_hero_name(&h.to_lowercase()));
    let db_path = args.get(3).map(String::as_str).unwrap_or("scrim-stats.db");

    match show(&player, hero.as_deref(), Path::new(db_path)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("no stats found for {player}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn show(player: &str, hero: Option<&str>, db_path: &Path) -> Result<bool> {
    let storage = Storage::open(db_path)?;

    let (profile, board) = match hero {
        Some(hero) => {
            let Some(profile) = player_hero_profile(&storage, player, hero)? else {
                return Ok(false);
            };
            (profile, hero_board(hero))
        }
        None => {
            let Some(profile) = player_profile(&storage, player)? else {
                return Ok(false);
            };
            // a missing artifact just means no ranks to show yet
            (profile, load_general_artifact(Path::new(GENERAL_LEADERBOARD_FILE)).ok())
        }
    };

    print_profile(&profile, board.as_ref());
    Ok(true)
}

/// The hero artifact is indexed by roster position.
fn hero_board(hero: &str) -> Option<Leaderboard> {
    let index = HEROES.iter().position(|h| *h == hero)?;
    let mut boards = load_hero_artifact(Path::new(HERO_LEADERBOARD_FILE)).ok()?;
    if index < boards.len() {
        Some(boards.swap_remove(index))
    } else {
        None
    }
}

fn print_profile(profile: &PlayerProfile, board: Option<&Leaderboard>) {
    println!("{}", profile.name);
    if let Some(team) = &profile.team {
        println!("team: {team}");
    }
    println!(
        "playtime: {}:{:02}",
        profile.playtime_secs / 60,
        profile.playtime_secs % 60
    );
    for (hero, secs) in &profile.top_heroes {
        println!("hero: {} {}:{:02}", hero, secs / 60, secs % 60);
    }

    let ranks = board.map(|b| leaderboard_ranks(b, &profile.name));
    for (i, rate) in profile.rates.iter().enumerate() {
        let Some(category) = StatCategory::from_usize(i) else {
            continue;
        };
        let Some(rate) = rate else { continue };
        match ranks.as_ref().and_then(|r| r.get(i).copied().flatten()) {
            Some(rank) => println!("{}: {:.2} (rank {})", category.label(), rate, rank),
            None => println!("{}: {:.2}", category.label(), rate),
        }
    }
    println!("all stats per 10 minutes");
}
