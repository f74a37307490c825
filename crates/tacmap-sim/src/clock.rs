//! Cooperative periodic driver for simulated telemetry.
//!
//! The clock owns no thread and no timer handle. The host run loop reports
//! elapsed time through `advance`, which fires due ticks one after another on
//! the caller's stack, so two ticks can never overlap. A tick that runs long
//! simply delays the next one.

use tacmap_core::error::TacticalError;

#[derive(Debug, Clone, Default)]
pub struct SimulationClock {
    /// Tick period while running.
    interval_ms: Option<u64>,
    /// Clock time (ms) since creation.
    now_ms: u64,
    /// Clock time at which the next tick is due.
    next_due_ms: u64,
    ticks_fired: u64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start firing every `interval_ms`.
    ///
    /// Idempotent: while running, a second call changes nothing and returns
    /// `Ok(false)`. The first tick is due one full interval from now.
    pub fn start(&mut self, interval_ms: u64) -> Result<bool, TacticalError> {
        if interval_ms == 0 {
            return Err(TacticalError::InvalidInterval);
        }
        if self.interval_ms.is_some() {
            return Ok(false);
        }
        self.interval_ms = Some(interval_ms);
        self.next_due_ms = self.now_ms + interval_ms;
        Ok(true)
    }

    /// Cancel future ticks. Safe to call when idle.
    pub fn stop(&mut self) {
        self.interval_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.interval_ms.is_some()
    }

    pub fn interval_ms(&self) -> Option<u64> {
        self.interval_ms
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn ticks_fired(&self) -> u64 {
        self.ticks_fired
    }

    /// Move clock time forward by `elapsed_ms`, calling `tick(due_ms)` for every
    /// period that came due, in order. Returns the number of ticks fired.
    ///
    /// A long stall replays every missed period before returning.
    pub fn advance(&mut self, elapsed_ms: u64, mut tick: impl FnMut(u64)) -> u32 {
        let target_ms = self.now_ms + elapsed_ms;
        let mut fired = 0;

        while let Some(interval) = self.interval_ms {
            if self.next_due_ms > target_ms {
                break;
            }
            let due = self.next_due_ms;
            self.now_ms = due;
            tick(due);
            fired += 1;
            self.ticks_fired += 1;
            self.next_due_ms = due + interval;
        }

        self.now_ms = target_ms;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_clock_never_fires() {
        let mut clock = SimulationClock::new();
        let fired = clock.advance(60_000, |_| panic!("idle clock fired"));
        assert_eq!(fired, 0);
        assert_eq!(clock.now_ms(), 60_000);
    }

    #[test]
    fn test_fires_once_per_interval() {
        let mut clock = SimulationClock::new();
        assert!(clock.start(5000).unwrap());

        let mut due_times = Vec::new();
        clock.advance(4999, |due| due_times.push(due));
        assert!(due_times.is_empty());
        clock.advance(1, |due| due_times.push(due));
        clock.advance(5000, |due| due_times.push(due));
        assert_eq!(due_times, [5000, 10_000]);
        assert_eq!(clock.ticks_fired(), 2);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut clock = SimulationClock::new();
        assert!(clock.start(1000).unwrap());
        assert!(!clock.start(10).unwrap());
        assert_eq!(clock.interval_ms(), Some(1000));

        let fired = clock.advance(1000, |_| {});
        assert_eq!(fired, 1, "a second start must not add a second timer");
    }

    #[test]
    fn test_stop_is_safe_and_halts_ticks() {
        let mut clock = SimulationClock::new();
        clock.stop();
        clock.start(100).unwrap();
        clock.advance(250, |_| {});
        clock.stop();
        clock.stop();
        assert_eq!(clock.advance(1000, |_| {}), 0);
        assert!(!clock.is_running());
        assert_eq!(clock.ticks_fired(), 2);
    }

    #[test]
    fn test_stall_replays_every_period() {
        let mut clock = SimulationClock::new();
        clock.start(100).unwrap();
        let mut due_times = Vec::new();
        let fired = clock.advance(10 * 100, |due| due_times.push(due));
        assert_eq!(fired, 10);
        assert_eq!(due_times, (1..=10).map(|n| n * 100).collect::<Vec<_>>());

        // Partial periods carry over to the next call.
        due_times.clear();
        assert_eq!(clock.advance(150, |due| due_times.push(due)), 1);
        assert_eq!(clock.advance(50, |due| due_times.push(due)), 1);
        assert_eq!(due_times, [1100, 1200]);
    }

    #[test]
    fn test_restart_schedules_from_now() {
        let mut clock = SimulationClock::new();
        clock.advance(333, |_| {});
        clock.start(100).unwrap();
        let mut due_times = Vec::new();
        clock.advance(100, |due| due_times.push(due));
        assert_eq!(due_times, [433]);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut clock = SimulationClock::new();
        assert!(matches!(clock.start(0), Err(TacticalError::InvalidInterval)));
        assert!(!clock.is_running());
    }
}
