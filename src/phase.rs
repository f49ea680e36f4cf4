/// Classification of one reporting tick. SETUP ticks (pre-game lobby,
/// pause menus, anything that breaks timestamp continuity) are excluded
/// from match duration and stat accumulation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Setup,
    Live,
}

/// Stateful single-pass tick classifier. Feed it the elapsed seconds of
/// each tick boundary in file order; there is no lookahead and a
/// classification is never revised.
pub struct PhaseClock {
    tick_interval_secs: usize,
    prev_seconds: Option<usize>,
    live_seconds: usize,
}

impl PhaseClock {
    pub fn new(tick_interval_secs: usize) -> PhaseClock {
        PhaseClock {
            tick_interval_secs,
            prev_seconds: None,
            live_seconds: 0,
        }
    }

    /// Classify the next tick. The first tick is the identity block and is
    /// always SETUP. After that a tick is LIVE when its timestamp sits
    /// within twice the tick interval of the previous one; the slack of one
    /// extra interval rides out a single missed report without breaking
    /// continuity. The previous-timestamp reference updates on every tick,
    /// whatever the tag, so the tick after a gap compares against the gap's
    /// own timestamp.
    pub fn observe(&mut self, elapsed_seconds: usize) -> Phase {
        let phase = match self.prev_seconds {
            Some(prev) if elapsed_seconds <= prev + 2 * self.tick_interval_secs => Phase::Live,
            Some(_) => Phase::Setup,
            None => Phase::Setup,
        };
        if phase == Phase::Live {
            self.live_seconds += self.tick_interval_secs;
        }
        self.prev_seconds = Some(elapsed_seconds);
        phase
    }

    /// Total LIVE match duration seen so far.
    pub fn live_seconds(&self) -> usize {
        self.live_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clean_log_is_live_after_the_first_tick() {
        let mut clock = PhaseClock::new(5);
        let stamps = [0, 5, 10, 15, 20];
        let tags: Vec<Phase> = stamps.iter().map(|s| clock.observe(*s)).collect();
        assert_eq!(tags[0], Phase::Setup);
        assert!(tags[1..].iter().all(|t| *t == Phase::Live));
        // duration = (tick count - 1) * interval
        assert_eq!(clock.live_seconds(), (stamps.len() - 1) * 5);
    }

    #[test]
    fn gap_breaks_continuity_then_resumes() {
        let mut clock = PhaseClock::new(5);
        assert_eq!(clock.observe(0), Phase::Setup);
        assert_eq!(clock.observe(5), Phase::Live);
        // pause: the clock jumps far ahead
        assert_eq!(clock.observe(95), Phase::Setup);
        // next tick is continuous with the gap timestamp again
        assert_eq!(clock.observe(100), Phase::Live);
        assert_eq!(clock.live_seconds(), 10);
    }

    #[test]
    fn one_missed_report_stays_live() {
        let mut clock = PhaseClock::new(5);
        clock.observe(0);
        assert_eq!(clock.observe(10), Phase::Live);
        assert_eq!(clock.observe(21), Phase::Setup);
    }

    #[test]
    fn backwards_timestamp_counts_as_continuous() {
        let mut clock = PhaseClock::new(5);
        clock.observe(30);
        assert_eq!(clock.observe(25), Phase::Live);
    }

    #[test]
    fn one_second_cadence_uses_its_own_tolerance() {
        let mut clock = PhaseClock::new(1);
        clock.observe(0);
        assert_eq!(clock.observe(2), Phase::Live);
        assert_eq!(clock.observe(5), Phase::Setup);
    }
}
