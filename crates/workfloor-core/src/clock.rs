//! Simulated clock and detector throttle.
//!
//! The clock is the single source of truth for time inside the simulation.
//! Every tick advances it by a fixed step, so runs are reproducible and
//! independent of wall-clock jitter. The detector throttle uses the same
//! clock to decide when the collaboration detector may run again.

use chrono::{DateTime, TimeDelta, Utc};

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Simulated time would leave the representable range.
    #[error("simulated time overflow after {now}")]
    TimeOverflow {
        /// Last representable time reached.
        now: DateTime<Utc>,
    },

    /// Invalid clock configuration.
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong.
        reason: String,
    },
}

/// Simulated clock advanced once per tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimClock {
    now: DateTime<Utc>,
    tick: u64,
    step: TimeDelta,
}

impl SimClock {
    /// Create a clock starting at `start` that advances `step_ms` per tick.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `step_ms` is 0.
    pub fn new(start: DateTime<Utc>, step_ms: u32) -> Result<Self, ClockError> {
        if step_ms == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "tick step must be at least 1 ms".to_owned(),
            });
        }
        Ok(Self {
            now: start,
            tick: 0,
            step: TimeDelta::milliseconds(i64::from(step_ms)),
        })
    }

    /// Advance by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] or [`ClockError::TimeOverflow`]
    /// if either counter would overflow. The clock is left unchanged.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        let tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        let now = self
            .now
            .checked_add_signed(self.step)
            .ok_or(ClockError::TimeOverflow { now: self.now })?;
        self.tick = tick;
        self.now = now;
        Ok(tick)
    }

    /// Current simulated time.
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Number of ticks run so far.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Time step per tick.
    pub const fn step(&self) -> TimeDelta {
        self.step
    }

    /// Time step per tick in seconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn step_seconds(&self) -> f64 {
        self.step.num_milliseconds() as f64 / 1000.0
    }
}

/// Limits how often the collaboration detector runs.
///
/// The first call always runs. After that a run is allowed once at least
/// `interval` of simulated time has passed since the previous run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionThrottle {
    interval: TimeDelta,
    last_run: Option<DateTime<Utc>>,
}

impl DetectionThrottle {
    /// Create a throttle with the given interval in milliseconds.
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval: TimeDelta::milliseconds(i64::from(interval_ms)),
            last_run: None,
        }
    }

    /// Whether the detector should run at `now`. Records the run if so.
    pub fn should_run(&mut self, now: DateTime<Utc>) -> bool {
        let due = self
            .last_run
            .is_none_or(|last| now.signed_duration_since(last) >= self.interval);
        if due {
            self.last_run = Some(now);
        }
        due
    }

    /// Time of the last recorded run.
    pub const fn last_run(&self) -> Option<DateTime<Utc>> {
        self.last_run
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn advance_moves_tick_and_time() {
        let mut clock = SimClock::new(start(), 50).unwrap();
        assert_eq!(clock.advance().unwrap(), 1);
        assert_eq!(clock.advance().unwrap(), 2);
        assert_eq!(clock.tick(), 2);
        assert_eq!(clock.now(), start() + TimeDelta::milliseconds(100));
        assert!((clock.step_seconds() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn zero_step_rejected() {
        assert!(matches!(
            SimClock::new(start(), 0),
            Err(ClockError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn time_overflow_leaves_clock_unchanged() {
        let mut clock = SimClock::new(DateTime::<Utc>::MAX_UTC, 1).unwrap();
        assert!(matches!(clock.advance(), Err(ClockError::TimeOverflow { .. })));
        assert_eq!(clock.tick(), 0);
    }

    #[test]
    fn throttle_runs_first_then_waits() {
        let mut throttle = DetectionThrottle::new(500);
        let t0 = start();
        assert!(throttle.should_run(t0));
        assert!(!throttle.should_run(t0 + TimeDelta::milliseconds(499)));
        assert!(throttle.should_run(t0 + TimeDelta::milliseconds(500)));
        assert_eq!(throttle.last_run(), Some(t0 + TimeDelta::milliseconds(500)));
        assert!(!throttle.should_run(t0 + TimeDelta::milliseconds(900)));
    }

    #[test]
    fn zero_interval_always_runs() {
        let mut throttle = DetectionThrottle::new(0);
        assert!(throttle.should_run(start()));
        assert!(throttle.should_run(start()));
    }
}
