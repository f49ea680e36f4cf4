use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of tracked stat categories. The order below is the wire order of
/// the log columns and the index order of the leaderboard artifacts.
pub const STAT_COUNT: usize = 10;

/// Seconds in the normalization basis: all rates are "per 10 minutes".
pub const RATE_BASIS_SECS: f64 = 600.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum StatCategory {
    DamageDealt = 0,
    DamageTaken = 1,
    Deaths = 2,
    FinalBlows = 3,
    Eliminations = 4,
    SoloKills = 5,
    HealingDealt = 6,
    EnvironmentalKills = 7,
    OffensiveAssists = 8,
    UltsUsed = 9,
}

impl StatCategory {
    pub const ALL: [StatCategory; STAT_COUNT] = [
        StatCategory::DamageDealt,
        StatCategory::DamageTaken,
        StatCategory::Deaths,
        StatCategory::FinalBlows,
        StatCategory::Eliminations,
        StatCategory::SoloKills,
        StatCategory::HealingDealt,
        StatCategory::EnvironmentalKills,
        StatCategory::OffensiveAssists,
        StatCategory::UltsUsed,
    ];

    /// Column name in the storage schema.
    pub fn column(self) -> &'static str {
        match self {
            StatCategory::DamageDealt => "damage_dealt",
            StatCategory::DamageTaken => "damage_taken",
            StatCategory::Deaths => "deaths",
            StatCategory::FinalBlows => "final_blows",
            StatCategory::Eliminations => "eliminations",
            StatCategory::SoloKills => "solo_kills",
            StatCategory::HealingDealt => "healing_dealt",
            StatCategory::EnvironmentalKills => "environmental_kills",
            StatCategory::OffensiveAssists => "offensive_assists",
            StatCategory::UltsUsed => "ults_used",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatCategory::DamageDealt => "Damage Dealt",
            StatCategory::DamageTaken => "Damage Taken",
            StatCategory::Deaths => "Deaths",
            StatCategory::FinalBlows => "Final Blows",
            StatCategory::Eliminations => "Eliminations",
            StatCategory::SoloKills => "Solo Kills",
            StatCategory::HealingDealt => "Healing Dealt",
            StatCategory::EnvironmentalKills => "Environmental Kills",
            StatCategory::OffensiveAssists => "Offensive Assists",
            StatCategory::UltsUsed => "Ultimates Used",
        }
    }
}

/// One value per stat category, in category order. Used both for raw
/// cumulative snapshot values and for tick deltas.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct StatLine(pub [f64; STAT_COUNT]);

impl StatLine {
    pub fn add(&mut self, other: &StatLine) {
        for i in 0..STAT_COUNT {
            self.0[i] += other.0[i];
        }
    }

    /// Field-wise `self - previous`. May go negative if an underlying
    /// counter reset mid-match; callers decide what to do with that.
    pub fn minus(&self, previous: &StatLine) -> StatLine {
        let mut delta = StatLine::default();
        for i in 0..STAT_COUNT {
            delta.0[i] = self.0[i] - previous.0[i];
        }
        delta
    }

    pub fn has_negative(&self) -> bool {
        self.0.iter().any(|v| *v < 0.0)
    }
}

impl Index<StatCategory> for StatLine {
    type Output = f64;

    fn index(&self, category: StatCategory) -> &f64 {
        &self.0[category as usize]
    }
}

impl IndexMut<StatCategory> for StatLine {
    fn index_mut(&mut self, category: StatCategory) -> &mut f64 {
        &mut self.0[category as usize]
    }
}

/// Normalize an accumulated total to a per-10-minutes rate. Raw totals are
/// stored as-is; every display or ranking path goes through here, so raw
/// sums and rates are never mixed. `None` when there is no playtime to
/// normalize against.
pub fn per_ten_minutes(total: f64, duration_secs: i64) -> Option<f64> {
    if duration_secs <= 0 {
        return None;
    }
    Some(total / duration_secs as f64 * RATE_BASIS_SECS)
}
