use crate::error::{Error, Result};
use crate::stats::{STAT_COUNT, StatCategory, per_ten_minutes};
use crate::storage::Storage;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const LEADERBOARD_SIZE: usize = 10;

/// A player needs half an hour of total playtime before their rates mean
/// anything; on a single hero ten minutes is enough.
pub const MIN_TOTAL_PLAYTIME_SECS: i64 = 1800;
pub const MIN_HERO_PLAYTIME_SECS: i64 = 600;

pub const GENERAL_LEADERBOARD_FILE: &str = "leaderboards.json";
pub const HERO_LEADERBOARD_FILE: &str = "hero_leaderboards.json";

/// One ranking per stat category, in category order; each ranking holds up
/// to ten player names, rank 1 first.
pub type Leaderboard = Vec<Vec<String>>;

/// One `Leaderboard` per hero, in roster order.
pub type HeroLeaderboards = Vec<Leaderboard>;

/// Per-category candidate tables of per-10-minute rates. BTreeMap keys the
/// candidates by name so extraction order is reproducible.
type RateTables = Vec<BTreeMap<String, f64>>;

/// Rank every eligible player on overall per-10-minute rates. Any storage
/// failure aborts the whole rebuild: a leaderboard missing one player would
/// silently misrank everyone below them.
pub fn build_general_leaderboards(storage: &Storage) -> Result<Leaderboard> {
    let mut tables: RateTables = vec![BTreeMap::new(); STAT_COUNT];

    for player in storage.player_names()? {
        let Some((totals, secs)) = storage.player_totals(&player)? else {
            continue;
        };
        if secs < MIN_TOTAL_PLAYTIME_SECS {
            continue;
        }
        insert_rates(&mut tables, &player, &totals.0, secs);
    }

    Ok(tables.into_iter().map(rank_top_entries).collect())
}

/// Rank every eligible (player, hero) pair, independently per hero in the
/// given roster. Same all-or-nothing failure policy as the general pass.
pub fn build_hero_leaderboards(storage: &Storage, roster: &[&str]) -> Result<HeroLeaderboards> {
    let players = storage.player_names()?;
    let mut boards = Vec::with_capacity(roster.len());

    for hero in roster {
        let mut tables: RateTables = vec![BTreeMap::new(); STAT_COUNT];
        for player in &players {
            let Some((totals, secs)) = storage.player_hero_totals(player, hero)? else {
                continue;
            };
            if secs < MIN_HERO_PLAYTIME_SECS {
                continue;
            }
            insert_rates(&mut tables, player, &totals.0, secs);
        }
        boards.push(tables.into_iter().map(rank_top_entries).collect());
    }

    Ok(boards)
}

/// A player with no playtime has no rate and simply never enters the
/// candidate table for any category.
fn insert_rates(tables: &mut RateTables, player: &str, totals: &[f64; STAT_COUNT], secs: i64) {
    for category in StatCategory::ALL {
        if let Some(rate) = per_ten_minutes(totals[category as usize], secs) {
            tables[category as usize].insert(player.to_string(), rate);
        }
    }
}

/// Top-10 by repeated maximum extraction. Only strictly positive rates are
/// ever selected, so an all-zero category yields a short or empty ranking.
/// The scan keeps strictly greater values only and the table iterates in
/// name order, so among exactly equal rates the lexically first player
/// wins; each winner leaves the pool before the next scan, so no name
/// repeats.
fn rank_top_entries(mut table: BTreeMap<String, f64>) -> Vec<String> {
    let mut ranking = Vec::new();

    while ranking.len() < LEADERBOARD_SIZE {
        let mut best_rate = 0.0;
        let mut best_player: Option<String> = None;

        for (player, rate) in &table {
            if *rate > best_rate {
                best_rate = *rate;
                best_player = Some(player.clone());
            }
        }

        match best_player {
            Some(player) => {
                table.remove(&player);
                ranking.push(player);
            }
            None => break,
        }
    }

    ranking
}

/// Write a leaderboard artifact, replacing any previous one wholesale.
pub fn save_artifact<T: serde::Serialize>(board: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(board).map_err(|source| Error::ArtifactFormat {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| Error::ArtifactWrite {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_general_artifact(path: &Path) -> Result<Leaderboard> {
    load_artifact(path)
}

pub fn load_hero_artifact(path: &Path) -> Result<HeroLeaderboards> {
    load_artifact(path)
}

fn load_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).map_err(|source| Error::ArtifactRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| Error::ArtifactFormat {
        path: path.to_path_buf(),
        source,
    })
}

/// 1-based rank of a player in each category's ranking; `None` when the
/// player did not place.
pub fn leaderboard_ranks(board: &Leaderboard, player: &str) -> Vec<Option<usize>> {
    board
        .iter()
        .map(|ranking| {
            ranking
                .iter()
                .position(|name| name == player)
                .map(|i| i + 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_collection::{HeroBreakdown, MatchStats, PlayerMatchStats};
    use crate::stats::StatLine;
    use pretty_assertions::assert_eq;

    fn damage_line(value: f64) -> StatLine {
        let mut line = StatLine::default();
        line[StatCategory::DamageDealt] = value;
        line
    }

    /// One solo-player match with the given damage total and duration, all
    /// of it on the given hero.
    fn solo_match(name: &str, hero: &str, damage: f64, secs: usize) -> MatchStats {
        MatchStats {
            duration_secs: secs,
            players: vec![PlayerMatchStats {
                name: name.to_string(),
                team: "frogs".to_string(),
                totals: damage_line(damage),
                duration_secs: secs,
                heroes: vec![HeroBreakdown {
                    hero: hero.to_string(),
                    time_secs: secs,
                    stats: damage_line(damage),
                }],
            }],
        }
    }

    fn seeded_storage(matches: &[MatchStats]) -> Storage {
        let storage = Storage::open_in_memory().unwrap();
        let game = storage.create_match("frogs", "owls", false).unwrap();
        for stats in matches {
            storage.save_match_stats(game, "oasis", "frogs", stats).unwrap();
        }
        storage
    }

    #[test]
    fn extraction_is_sorted_and_duplicate_free() {
        let mut table = BTreeMap::new();
        for (name, rate) in [
            ("a", 5.0),
            ("b", 9.0),
            ("c", 1.0),
            ("d", 7.0),
            ("e", 7.0),
            ("f", 0.0),
            ("g", -2.0),
        ] {
            table.insert(name.to_string(), rate);
        }
        let rates = table.clone();

        let ranking = rank_top_entries(table);
        assert_eq!(ranking, vec!["b", "d", "e", "a", "c"]);

        // strictly non-increasing rates, no repeats
        for pair in ranking.windows(2) {
            assert!(rates[&pair[0]] >= rates[&pair[1]]);
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn extraction_caps_at_ten() {
        let mut table = BTreeMap::new();
        for i in 0..15 {
            table.insert(format!("p{i:02}"), (i + 1) as f64);
        }
        let ranking = rank_top_entries(table);
        assert_eq!(ranking.len(), LEADERBOARD_SIZE);
        assert_eq!(ranking[0], "p14");
    }

    #[test]
    fn equal_rates_break_ties_by_name() {
        let mut table = BTreeMap::new();
        table.insert("zed".to_string(), 4.0);
        table.insert("amy".to_string(), 4.0);
        assert_eq!(rank_top_entries(table), vec!["amy", "zed"]);
    }

    #[test]
    fn all_zero_category_yields_empty_ranking() {
        let mut table = BTreeMap::new();
        table.insert("a".to_string(), 0.0);
        table.insert("b".to_string(), 0.0);
        assert_eq!(rank_top_entries(table), Vec::<String>::new());
    }

    #[test]
    fn general_eligibility_boundary_is_1800_seconds() {
        let storage = seeded_storage(&[
            solo_match("under", "ana", 1000.0, 1799),
            solo_match("exact", "ana", 1000.0, 1800),
        ]);
        let board = build_general_leaderboards(&storage).unwrap();
        let damage = &board[StatCategory::DamageDealt as usize];
        assert_eq!(damage, &vec!["exact".to_string()]);
    }

    #[test]
    fn hero_eligibility_boundary_is_600_seconds() {
        let storage = seeded_storage(&[
            solo_match("under", "ana", 1000.0, 599),
            solo_match("exact", "ana", 1000.0, 600),
        ]);
        let boards = build_hero_leaderboards(&storage, &["ana", "mercy"]).unwrap();
        let ana_damage = &boards[0][StatCategory::DamageDealt as usize];
        assert_eq!(ana_damage, &vec!["exact".to_string()]);
        // nobody played mercy
        assert!(boards[1].iter().all(|ranking| ranking.is_empty()));
    }

    #[test]
    fn general_ranking_orders_by_rate_not_total() {
        // grinder has the bigger total but the lower rate
        let storage = seeded_storage(&[
            solo_match("grinder", "ana", 9000.0, 9000),
            solo_match("sniper", "ana", 6000.0, 3000),
        ]);
        let board = build_general_leaderboards(&storage).unwrap();
        assert_eq!(
            board[StatCategory::DamageDealt as usize],
            vec!["sniper".to_string(), "grinder".to_string()]
        );
    }

    #[test]
    fn artifact_round_trips_through_disk() {
        let storage = seeded_storage(&[solo_match("eis", "ana", 1000.0, 1800)]);
        let board = build_general_leaderboards(&storage).unwrap();

        let dir = std::env::temp_dir().join("scrim-stats-artifact-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(GENERAL_LEADERBOARD_FILE);
        save_artifact(&board, &path).unwrap();
        let loaded = load_general_artifact(&path).unwrap();
        assert_eq!(loaded, board);
    }

    #[test]
    fn ranks_are_one_based_and_optional() {
        let board: Leaderboard = vec![
            vec!["amy".to_string(), "zed".to_string()],
            vec!["zed".to_string()],
        ];
        assert_eq!(leaderboard_ranks(&board, "zed"), vec![Some(2), Some(1)]);
        assert_eq!(leaderboard_ranks(&board, "amy"), vec![Some(1), None]);
        assert_eq!(leaderboard_ranks(&board, "ghost"), vec![None, None]);
    }
}
