use std::time::Duration;

/// Fixed 60 Hz simulation step, with a catch-up cap so a stalled process
/// (GC pause, slow host) resyncs to wall clock instead of spiraling into an
/// ever-growing backlog of ticks to replay.
pub const TICK_HZ: u32 = 60;
pub const TICK_DT: Duration = Duration::from_nanos(1_000_000_000 / TICK_HZ as u64);
pub const MAX_CATCHUP_TICKS: u32 = 8;

/// Separate, slower cadence for serializing and enqueuing room snapshots.
pub const BROADCAST_HZ: u32 = 20;
pub const BROADCAST_DT: Duration = Duration::from_nanos(1_000_000_000 / BROADCAST_HZ as u64);

/// Tracks `next_tick` wall-clock deadline and decides, each wall-clock
/// iteration, how many simulation steps to run right now.
pub struct TickClock {
    next_tick: Duration,
    tick_count: u64,
}

impl TickClock {
    pub fn starting_at(now: Duration) -> Self {
        Self {
            next_tick: now,
            tick_count: 0,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Given the current wall-clock time, returns how many ticks should run
    /// now (0 if `now` hasn't reached `next_tick` yet, capped at
    /// [`MAX_CATCHUP_TICKS`]) and advances `next_tick` accordingly. If the
    /// backlog exceeds the cap, `next_tick` is resynced to `now` instead of
    /// accumulating debt.
    pub fn ticks_due(&mut self, now: Duration) -> u32 {
        if now < self.next_tick {
            return 0;
        }
        let behind = now - self.next_tick;
        let mut due = (behind.as_nanos() / TICK_DT.as_nanos()) as u32 + 1;
        if due > MAX_CATCHUP_TICKS {
            due = MAX_CATCHUP_TICKS;
            // Too far behind to ever catch up: drop the remaining backlog
            // and resync so the next deadline is one tick past wall clock.
            self.next_tick = now + TICK_DT;
        } else {
            self.next_tick += TICK_DT * due;
        }
        self.tick_count += due as u64;
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_ticks_due_before_deadline() {
        let mut clock = TickClock::starting_at(Duration::from_secs(0));
        assert_eq!(clock.ticks_due(Duration::from_millis(1)), 0);
    }

    #[test]
    fn one_tick_due_at_deadline() {
        let mut clock = TickClock::starting_at(Duration::from_secs(0));
        assert_eq!(clock.ticks_due(TICK_DT), 1);
    }

    #[test]
    fn catchup_is_capped_and_resyncs() {
        let mut clock = TickClock::starting_at(Duration::from_secs(0));
        let far_future = TICK_DT * 1000;
        let due = clock.ticks_due(far_future);
        assert_eq!(due, MAX_CATCHUP_TICKS);
        assert_eq!(clock.ticks_due(far_future), 0);
    }
}
