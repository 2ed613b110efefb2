//! Simulation clock.
//!
//! The clock is the single source of simulation time. Every tick the driver
//! advances it by the real elapsed time; the clock scales that by its time
//! scale. A time scale of zero freezes the simulation: cooldowns stop
//! elapsing and hit reactions stop progressing.

use serde::{Deserialize, Serialize};

/// Supplies simulation time and elapsed-time-per-tick.
pub trait Clock {
    /// Current simulation time in seconds.
    fn now(&self) -> f32;

    /// Scaled time elapsed during the last advance.
    fn delta(&self) -> f32;

    /// Current time scale (1.0 = normal, 0.0 = frozen).
    fn time_scale(&self) -> f32;

    /// Sets the time scale. Negative values are treated as zero.
    fn set_time_scale(&mut self, scale: f32);

    /// Advances the clock by `real_dt` unscaled seconds.
    fn advance(&mut self, real_dt: f32);

    /// Returns whether simulation time is frozen.
    fn is_frozen(&self) -> bool {
        self.time_scale() <= 0.0
    }
}

/// Default clock driven by the tick loop.
///
/// Time accumulates in `f64` so that summing many small steps does not
/// drift across cooldown boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    /// Accumulated scaled time
    now: f64,
    /// Scaled delta of the last advance
    delta: f32,
    /// Time scale multiplier
    time_scale: f32,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimClock {
    /// Creates a clock at time zero with normal speed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: 0.0,
            delta: 0.0,
            time_scale: 1.0,
        }
    }

    /// Creates a clock starting at the given time.
    #[must_use]
    pub fn starting_at(now: f32) -> Self {
        Self {
            now: f64::from(now),
            ..Self::new()
        }
    }
}

impl Clock for SimClock {
    fn now(&self) -> f32 {
        self.now as f32
    }

    fn delta(&self) -> f32 {
        self.delta
    }

    fn time_scale(&self) -> f32 {
        self.time_scale
    }

    fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    fn advance(&mut self, real_dt: f32) {
        self.delta = real_dt.max(0.0) * self.time_scale;
        self.now += f64::from(self.delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advance() {
        let mut clock = SimClock::new();
        clock.advance(0.5);
        clock.advance(0.25);
        assert!((clock.now() - 0.75).abs() < 1e-6);
        assert!((clock.delta() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_clock_scaled() {
        let mut clock = SimClock::new();
        clock.set_time_scale(0.5);
        clock.advance(1.0);
        assert!((clock.now() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clock_frozen() {
        let mut clock = SimClock::starting_at(3.0);
        clock.set_time_scale(0.0);
        assert!(clock.is_frozen());

        clock.advance(1.0);
        assert_eq!(clock.now(), 3.0);
        assert_eq!(clock.delta(), 0.0);
    }

    #[test]
    fn test_clock_fixed_steps_do_not_drift() {
        let mut clock = SimClock::new();
        for _ in 0..18_000 {
            clock.advance(1.0 / 60.0);
        }
        assert!((clock.now() - 300.0).abs() < 1e-4);
    }

    #[test]
    fn test_clock_negative_scale_clamped() {
        let mut clock = SimClock::new();
        clock.set_time_scale(-2.0);
        assert_eq!(clock.time_scale(), 0.0);
    }
}
