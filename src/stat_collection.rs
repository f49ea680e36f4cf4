use crate::config::MatchConfig;
use crate::error::{Error, Result};
use crate::phase::{Phase, PhaseClock};
use crate::snapshot::{self, SnapshotRecord};
use crate::stats::StatLine;
use std::collections::BTreeSet;
use tracing::warn;

/// Stats a player accumulated on one hero, from tick deltas only.
#[derive(Clone, Debug, PartialEq)]
pub struct HeroBreakdown {
    pub hero: String,
    pub time_secs: usize,
    pub stats: StatLine,
}

/// One player's results for a whole match. `totals` comes from the final
/// snapshot block, never from summing deltas; the hero breakdowns carry the
/// delta-attributed per-hero split.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerMatchStats {
    pub name: String,
    pub team: String,
    pub totals: StatLine,
    pub duration_secs: usize,
    pub heroes: Vec<HeroBreakdown>,
}

impl PlayerMatchStats {
    fn new(name: String) -> PlayerMatchStats {
        PlayerMatchStats {
            name,
            team: String::new(),
            totals: StatLine::default(),
            duration_secs: 0,
            heroes: Vec::new(),
        }
    }

    /// Credit one tick's delta to the hero the player is currently on,
    /// creating the breakdown entry the first time that hero shows up. The
    /// tick interval counts toward that hero's playtime either way.
    fn credit_hero(&mut self, hero: &str, delta: &StatLine, interval_secs: usize) {
        match self.heroes.iter_mut().find(|h| h.hero == hero) {
            Some(entry) => {
                entry.stats.add(delta);
                entry.time_secs += interval_secs;
            }
            None => self.heroes.push(HeroBreakdown {
                hero: hero.to_string(),
                time_secs: interval_secs,
                stats: *delta,
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MatchStats {
    pub duration_secs: usize,
    pub players: Vec<PlayerMatchStats>,
}

/// Walk a complete match log and build per-player match totals plus
/// per-hero breakdowns.
///
/// The first tick establishes the slot-to-player identity mapping and
/// contributes nothing else. Each later LIVE tick contributes, per slot,
/// the delta between the current record and the record last seen in that
/// slot; the delta is credited entirely to the hero of the current record
/// (a mid-tick hero swap is invisible at this granularity). The retained
/// record for a slot is replaced on every tick, SETUP included, so a delta
/// never spans a continuity gap. The last tick's cumulative values are the
/// authoritative match totals.
pub fn collect_match_stats(lines: &[String], config: &MatchConfig) -> Result<MatchStats> {
    let slots = config.players_per_tick;
    if lines.len() < slots {
        return Err(Error::TruncatedLog { lines: lines.len() });
    }

    let mut players = read_identity_block(&lines[..slots])?;

    let mut clock = PhaseClock::new(config.tick_interval_secs);
    let mut prev_records: Vec<Option<SnapshotRecord>> = vec![None; slots];
    let mut phase = Phase::Setup;

    for (idx, line) in lines.iter().enumerate() {
        let slot = idx % slots;
        if slot == 0 {
            phase = clock.observe(snapshot::parse_elapsed_seconds(line));
        }
        let record = SnapshotRecord::parse(line, idx + 1)?;

        if phase == Phase::Live && idx >= slots {
            match players.iter_mut().find(|p| p.name == record.player) {
                Some(player) => {
                    if let Some(prev) = &prev_records[slot] {
                        let delta = record.stats.minus(&prev.stats);
                        if delta.has_negative() {
                            warn!(
                                player = %record.player,
                                line = idx + 1,
                                "stat counter went backwards, keeping raw delta"
                            );
                        }
                        player.credit_hero(&record.hero, &delta, config.tick_interval_secs);
                    }
                }
                None => warn!(
                    player = %record.player,
                    line = idx + 1,
                    "snapshot for a player outside the identity block, skipping"
                ),
            }
        }
        prev_records[slot] = Some(record);
    }

    finalize_totals(lines, &mut players, slots, clock.live_seconds())?;

    Ok(MatchStats {
        duration_secs: clock.live_seconds(),
        players,
    })
}

fn read_identity_block(block: &[String]) -> Result<Vec<PlayerMatchStats>> {
    let mut players = Vec::with_capacity(block.len());
    let mut distinct = BTreeSet::new();
    for (i, line) in block.iter().enumerate() {
        let record = SnapshotRecord::parse(line, i + 1)?;
        distinct.insert(record.player.clone());
        players.push(PlayerMatchStats::new(record.player));
    }
    if distinct.len() != players.len() {
        return Err(Error::IdentityBlock {
            expected: players.len(),
            found: distinct.len(),
        });
    }
    Ok(players)
}

/// The last tick's records carry the log's own running totals; copy them
/// verbatim as the match totals and stamp the LIVE duration. A final-block
/// name that was never in the identity block is skipped, no player is
/// fabricated.
fn finalize_totals(
    lines: &[String],
    players: &mut [PlayerMatchStats],
    slots: usize,
    duration_secs: usize,
) -> Result<()> {
    let tail_start = lines.len() - slots;
    for (i, line) in lines[tail_start..].iter().enumerate() {
        let record = SnapshotRecord::parse(line, tail_start + i + 1)?;
        match players.iter_mut().find(|p| p.name == record.player) {
            Some(player) => {
                player.totals = record.stats;
                player.team = record.team;
                player.duration_secs = duration_secs;
            }
            None => warn!(
                player = %record.player,
                "final snapshot for unknown player, skipping"
            ),
        }
    }
    Ok(())
}
