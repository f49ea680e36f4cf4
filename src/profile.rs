use crate::error::Result;
use crate::stats::{STAT_COUNT, per_ten_minutes};
use crate::storage::Storage;

const TOP_HERO_COUNT: usize = 3;

/// A player's normalized view of their stored totals: per-10-minute rates
/// in category order (`None` where no playtime backs the category), team,
/// and most-played heroes.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerProfile {
    pub name: String,
    pub team: Option<String>,
    pub rates: [Option<f64>; STAT_COUNT],
    pub playtime_secs: i64,
    pub top_heroes: Vec<(String, i64)>,
}

/// Overall profile across every map the player appears on. `Ok(None)` when
/// the player is unknown.
pub fn player_profile(storage: &Storage, name: &str) -> Result<Option<PlayerProfile>> {
    let name = name.to_lowercase();
    let Some((totals, secs)) = storage.player_totals(&name)? else {
        return Ok(None);
    };

    Ok(Some(PlayerProfile {
        team: storage.player_team(&name)?,
        rates: normalize(&totals.0, secs),
        playtime_secs: secs,
        top_heroes: storage.top_heroes(&name, TOP_HERO_COUNT)?,
        name,
    }))
}

/// Profile scoped to one hero. The hero name goes through no alias
/// handling here; callers canonicalize first.
pub fn player_hero_profile(
    storage: &Storage,
    name: &str,
    hero: &str,
) -> Result<Option<PlayerProfile>> {
    let name = name.to_lowercase();
    let Some((totals, secs)) = storage.player_hero_totals(&name, hero)? else {
        return Ok(None);
    };

    Ok(Some(PlayerProfile {
        team: storage.player_team(&name)?,
        rates: normalize(&totals.0, secs),
        playtime_secs: secs,
        top_heroes: vec![(hero.to_string(), secs)],
        name,
    }))
}

fn normalize(totals: &[f64; STAT_COUNT], secs: i64) -> [Option<f64>; STAT_COUNT] {
    let mut rates = [None; STAT_COUNT];
    for (i, total) in totals.iter().enumerate() {
        rates[i] = per_ten_minutes(*total, secs);
    }
    rates
}
