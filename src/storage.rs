use crate::error::Result;
use crate::stat_collection::{MatchStats, PlayerMatchStats};
use crate::stats::{STAT_COUNT, StatLine};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use tracing::warn;

const STAT_COLUMNS: &str = "damage_dealt, damage_taken, deaths, final_blows, eliminations, \
     solo_kills, healing_dealt, environmental_kills, offensive_assists, ults_used";

/// SQLite-backed store for cumulative match, player and player-hero stats.
/// Raw totals only; normalization happens at read time in the callers.
/// Not safe for concurrent ingestion of two matches touching the same
/// players; callers serialize match processing.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> Result<Storage> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let storage = Storage { conn };
        storage.init_schema()?;
        Ok(storage)
    }

    /// In-memory database, for tests.
    pub fn open_in_memory() -> Result<Storage> {
        let conn = Connection::open_in_memory()?;
        let storage = Storage { conn };
        storage.init_schema()?;
        Ok(storage)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS team (
                name TEXT PRIMARY KEY,
                seasons_played INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS player (
                name TEXT PRIMARY KEY,
                team TEXT,
                FOREIGN KEY (team) REFERENCES team(name)
            );

            CREATE TABLE IF NOT EXISTS game (
                id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                team1 TEXT,
                team2 TEXT,
                grandfinals INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (team1) REFERENCES team(name),
                FOREIGN KEY (team2) REFERENCES team(name)
            );

            CREATE TABLE IF NOT EXISTS map (
                id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                game_id INTEGER,
                name TEXT,
                winner TEXT,
                duration_in_seconds INTEGER,
                FOREIGN KEY (game_id) REFERENCES game(id)
            );

            CREATE TABLE IF NOT EXISTS map_player (
                id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                map_id INTEGER,
                player TEXT,
                damage_dealt REAL,
                damage_taken REAL,
                deaths REAL,
                final_blows REAL,
                eliminations REAL,
                solo_kills REAL,
                healing_dealt REAL,
                environmental_kills REAL,
                offensive_assists REAL,
                ults_used REAL,
                duration_in_seconds INTEGER,
                FOREIGN KEY (map_id) REFERENCES map(id),
                FOREIGN KEY (player) REFERENCES player(name)
            );

            CREATE TABLE IF NOT EXISTS player_hero (
                player TEXT,
                hero TEXT,
                damage_dealt REAL,
                damage_taken REAL,
                deaths REAL,
                final_blows REAL,
                eliminations REAL,
                solo_kills REAL,
                healing_dealt REAL,
                environmental_kills REAL,
                offensive_assists REAL,
                ults_used REAL,
                duration_in_seconds INTEGER,
                PRIMARY KEY (player, hero),
                FOREIGN KEY (player) REFERENCES player(name)
            );",
        )?;
        Ok(())
    }

    /// Register a match between two teams, creating team rows as needed.
    /// Returns the new match id.
    pub fn create_match(&self, team1: &str, team2: &str, grandfinals: bool) -> Result<i64> {
        let team1 = team1.to_lowercase();
        let team2 = team2.to_lowercase();
        for team in [&team1, &team2] {
            self.ensure_team(team)?;
        }
        self.conn.execute(
            "INSERT INTO game (team1, team2, grandfinals) VALUES (?1, ?2, ?3)",
            params![team1, team2, grandfinals as i64],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn ensure_team(&self, team: &str) -> Result<()> {
        if team.is_empty() {
            return Ok(());
        }
        self.conn.execute(
            "INSERT INTO team (name, seasons_played) VALUES (?1, 1)
             ON CONFLICT(name) DO NOTHING",
            params![team],
        )?;
        Ok(())
    }

    fn ensure_player(&self, name: &str, team: &str) -> Result<()> {
        self.ensure_team(team)?;
        self.conn.execute(
            "INSERT INTO player (name, team) VALUES (?1, ?2)
             ON CONFLICT(name) DO NOTHING",
            params![name, if team.is_empty() { None } else { Some(team) }],
        )?;
        Ok(())
    }

    /// Persist one ingested match: a map row, one map_player row per
    /// player, and an additive merge into each (player, hero) pair. A
    /// failure for one player is logged and the rest still save; writes
    /// already committed are not rolled back.
    pub fn save_match_stats(
        &self,
        game_id: i64,
        map_name: &str,
        winner: &str,
        stats: &MatchStats,
    ) -> Result<i64> {
        let map_name = map_name.to_lowercase();
        let winner = winner.to_lowercase();
        self.conn.execute(
            "INSERT INTO map (game_id, name, winner, duration_in_seconds)
             VALUES (?1, ?2, ?3, ?4)",
            params![game_id, map_name, winner, stats.duration_secs as i64],
        )?;
        let map_id = self.conn.last_insert_rowid();

        for player in &stats.players {
            if let Err(err) = self.save_player(map_id, player) {
                warn!(player = %player.name, %err, "skipping player while saving match stats");
            }
        }
        Ok(map_id)
    }

    fn save_player(&self, map_id: i64, player: &PlayerMatchStats) -> Result<()> {
        let name = player.name.to_lowercase();
        let team = player.team.to_lowercase();
        self.ensure_player(&name, &team)?;

        let t = &player.totals.0;
        self.conn.execute(
            &format!(
                "INSERT INTO map_player (map_id, player, {STAT_COLUMNS}, duration_in_seconds)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            ),
            params![
                map_id,
                name,
                t[0],
                t[1],
                t[2],
                t[3],
                t[4],
                t[5],
                t[6],
                t[7],
                t[8],
                t[9],
                player.duration_secs as i64
            ],
        )?;

        for hero in &player.heroes {
            let s = &hero.stats.0;
            self.conn.execute(
                &format!(
                    "INSERT INTO player_hero (player, hero, {STAT_COLUMNS}, duration_in_seconds)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                     ON CONFLICT(player, hero) DO UPDATE SET
                        damage_dealt = damage_dealt + excluded.damage_dealt,
                        damage_taken = damage_taken + excluded.damage_taken,
                        deaths = deaths + excluded.deaths,
                        final_blows = final_blows + excluded.final_blows,
                        eliminations = eliminations + excluded.eliminations,
                        solo_kills = solo_kills + excluded.solo_kills,
                        healing_dealt = healing_dealt + excluded.healing_dealt,
                        environmental_kills = environmental_kills + excluded.environmental_kills,
                        offensive_assists = offensive_assists + excluded.offensive_assists,
                        ults_used = ults_used + excluded.ults_used,
                        duration_in_seconds = duration_in_seconds + excluded.duration_in_seconds"
                ),
                params![
                    name,
                    hero.hero.to_lowercase(),
                    s[0],
                    s[1],
                    s[2],
                    s[3],
                    s[4],
                    s[5],
                    s[6],
                    s[7],
                    s[8],
                    s[9],
                    hero.time_secs as i64
                ],
            )?;
        }
        Ok(())
    }

    /// All known player names, in name order.
    pub fn player_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM player ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    pub fn player_team(&self, player: &str) -> Result<Option<String>> {
        let team = self
            .conn
            .query_row(
                "SELECT team FROM player WHERE name = ?1",
                params![player],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(team.flatten())
    }

    /// Summed raw totals and playtime across every map the player appears
    /// on. `None` when the player has no map rows at all.
    pub fn player_totals(&self, player: &str) -> Result<Option<(StatLine, i64)>> {
        let row = self
            .conn
            .query_row(
                "SELECT SUM(damage_dealt), SUM(damage_taken), SUM(deaths), \
                 SUM(final_blows), SUM(eliminations), SUM(solo_kills), \
                 SUM(healing_dealt), SUM(environmental_kills), \
                 SUM(offensive_assists), SUM(ults_used), SUM(duration_in_seconds) \
                 FROM map_player WHERE player = ?1",
                params![player],
                read_summed_stat_row,
            )
            .optional()?;
        Ok(row.flatten())
    }

    /// Accumulated totals and playtime for one (player, hero) pair.
    pub fn player_hero_totals(&self, player: &str, hero: &str) -> Result<Option<(StatLine, i64)>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {STAT_COLUMNS}, duration_in_seconds \
                     FROM player_hero WHERE player = ?1 AND hero = ?2"
                ),
                params![player, hero],
                |row| {
                    let mut line = StatLine::default();
                    for i in 0..STAT_COUNT {
                        line.0[i] = row.get(i)?;
                    }
                    Ok((line, row.get::<_, i64>(STAT_COUNT)?))
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn total_playtime(&self, player: &str) -> Result<Option<i64>> {
        let secs = self
            .conn
            .query_row(
                "SELECT SUM(duration_in_seconds) FROM map_player WHERE player = ?1",
                params![player],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?;
        Ok(secs.flatten())
    }

    /// The player's most-played heroes, longest playtime first.
    pub fn top_heroes(&self, player: &str, limit: usize) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT hero, duration_in_seconds FROM player_hero
             WHERE player = ?1 ORDER BY duration_in_seconds DESC LIMIT ?2",
        )?;
        let heroes = stmt
            .query_map(params![player, limit as i64], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<rusqlite::Result<Vec<(String, i64)>>>()?;
        Ok(heroes)
    }
}

/// Reads an 11-column SUM row; the SUMs are NULL when no rows matched.
fn read_summed_stat_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Option<(StatLine, i64)>> {
    let secs: Option<i64> = row.get(STAT_COUNT)?;
    let Some(secs) = secs else {
        return Ok(None);
    };
    let mut line = StatLine::default();
    for i in 0..STAT_COUNT {
        line.0[i] = row.get::<_, Option<f64>>(i)?.unwrap_or(0.0);
    }
    Ok(Some((line, secs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_collection::{HeroBreakdown, PlayerMatchStats};
    use crate::stats::StatCategory;
    use pretty_assertions::assert_eq;

    fn damage_line(value: f64) -> StatLine {
        let mut line = StatLine::default();
        line[StatCategory::DamageDealt] = value;
        line
    }

    fn sample_match() -> MatchStats {
        MatchStats {
            duration_secs: 600,
            players: vec![PlayerMatchStats {
                name: "Eis".to_string(),
                team: "Frogs".to_string(),
                totals: damage_line(4000.0),
                duration_secs: 600,
                heroes: vec![
                    HeroBreakdown {
                        hero: "Ana".to_string(),
                        time_secs: 400,
                        stats: damage_line(2500.0),
                    },
                    HeroBreakdown {
                        hero: "mercy".to_string(),
                        time_secs: 200,
                        stats: damage_line(1500.0),
                    },
                ],
            }],
        }
    }

    #[test]
    fn names_are_lowercased_on_save() {
        let storage = Storage::open_in_memory().unwrap();
        let game = storage.create_match("Frogs", "Owls", false).unwrap();
        storage
            .save_match_stats(game, "Oasis", "Frogs", &sample_match())
            .unwrap();

        assert_eq!(storage.player_names().unwrap(), vec!["eis".to_string()]);
        assert_eq!(storage.player_team("eis").unwrap(), Some("frogs".to_string()));
        assert!(storage.player_hero_totals("eis", "ana").unwrap().is_some());
    }

    #[test]
    fn player_hero_merge_is_additive() {
        let storage = Storage::open_in_memory().unwrap();
        let game = storage.create_match("frogs", "owls", false).unwrap();
        storage
            .save_match_stats(game, "oasis", "frogs", &sample_match())
            .unwrap();
        storage
            .save_match_stats(game, "nepal", "owls", &sample_match())
            .unwrap();

        let (stats, secs) = storage.player_hero_totals("eis", "ana").unwrap().unwrap();
        assert_eq!(stats[StatCategory::DamageDealt], 5000.0);
        assert_eq!(secs, 800);
    }

    #[test]
    fn player_totals_sum_across_maps() {
        let storage = Storage::open_in_memory().unwrap();
        let game = storage.create_match("frogs", "owls", false).unwrap();
        storage
            .save_match_stats(game, "oasis", "frogs", &sample_match())
            .unwrap();
        storage
            .save_match_stats(game, "nepal", "owls", &sample_match())
            .unwrap();

        let (totals, secs) = storage.player_totals("eis").unwrap().unwrap();
        assert_eq!(totals[StatCategory::DamageDealt], 8000.0);
        assert_eq!(secs, 1200);
        assert_eq!(storage.total_playtime("eis").unwrap(), Some(1200));
    }

    #[test]
    fn unknown_player_reads_as_none() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.player_totals("nobody").unwrap(), None);
        assert_eq!(storage.total_playtime("nobody").unwrap(), None);
        assert_eq!(storage.player_team("nobody").unwrap(), None);
    }

    #[test]
    fn top_heroes_order_by_playtime() {
        let storage = Storage::open_in_memory().unwrap();
        let game = storage.create_match("frogs", "owls", false).unwrap();
        storage
            .save_match_stats(game, "oasis", "frogs", &sample_match())
            .unwrap();

        let heroes = storage.top_heroes("eis", 3).unwrap();
        assert_eq!(
            heroes,
            vec![("ana".to_string(), 400), ("mercy".to_string(), 200)]
        );
    }
}
