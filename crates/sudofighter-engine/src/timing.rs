//! Frame timing for the match driver.
//!
//! The simulation always advances in fixed steps. In real-time mode the
//! driver measures wall-clock frames and feeds them to the accumulator;
//! headless runs feed exactly one step per frame.

use std::time::{Duration, Instant};

/// Most fixed steps run for a single frame.
const MAX_STEPS_PER_FRAME: u32 = 10;

/// Frame timing manager.
#[derive(Debug)]
pub struct FrameTiming {
    /// Fixed steps per second
    tick_rate: u32,
    /// Wall-clock budget per step
    frame_budget: Duration,
    /// Time of last frame start
    last_frame: Instant,
    /// Accumulator for fixed timestep
    accumulator: f32,
    /// Fixed timestep delta
    fixed_dt: f32,
    /// Maximum delta time to prevent spiral of death
    max_dt: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameTiming {
    /// Create a timing manager stepping `tick_rate` times per second.
    #[must_use]
    pub fn new(tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        Self {
            tick_rate,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(tick_rate)),
            last_frame: Instant::now(),
            accumulator: 0.0,
            fixed_dt: 1.0 / tick_rate as f32,
            max_dt: 0.25,
        }
    }

    /// Get the fixed timestep value.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Get the tick rate.
    #[must_use]
    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    /// Calculate delta time since last frame, clamped to `max_dt`.
    pub fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt.min(self.max_dt)
    }

    /// Accumulate time for fixed timestep updates.
    /// Returns the number of fixed updates that should be performed.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut count = 0;

        // tolerate float drift when dt is exactly one step
        let threshold = self.fixed_dt * (1.0 - 1e-4);
        while self.accumulator >= threshold && count < MAX_STEPS_PER_FRAME {
            self.accumulator = (self.accumulator - self.fixed_dt).max(0.0);
            count += 1;
        }

        // If we're still behind, reset accumulator
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        count
    }

    /// Sleep for the remainder of the step budget.
    pub fn sleep_remainder(&self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }

    /// Reset timing (call after pause or loading).
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_timing_creation() {
        let timing = FrameTiming::new(60);
        assert_eq!(timing.tick_rate(), 60);
        assert!((timing.fixed_dt() - 1.0 / 60.0).abs() < 0.001);
    }

    #[test]
    fn test_zero_tick_rate_clamped() {
        let timing = FrameTiming::new(0);
        assert_eq!(timing.tick_rate(), 1);
        assert!((timing.fixed_dt() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_frame_timing_max_dt() {
        let mut timing = FrameTiming::new(60);

        std::thread::sleep(Duration::from_millis(300));
        let dt = timing.delta_time();

        assert!(dt <= timing.max_dt);
    }

    #[test]
    fn test_one_step_per_fixed_dt() {
        let mut timing = FrameTiming::new(30);
        let dt = timing.fixed_dt();
        for _ in 0..100 {
            assert_eq!(timing.accumulate(dt), 1);
        }
    }

    #[test]
    fn test_fixed_timestep() {
        let mut timing = FrameTiming::new(60);

        // 32ms frame covers ~2 steps
        let updates = timing.accumulate(0.032);
        assert!(updates == 1 || updates == 2);
    }

    #[test]
    fn test_accumulate_spiral_prevention() {
        let mut timing = FrameTiming::new(60);

        let updates = timing.accumulate(1.0);

        assert!(updates <= MAX_STEPS_PER_FRAME);
        assert_eq!(timing.accumulator, 0.0);
    }

    #[test]
    fn test_reset_timing() {
        let mut timing = FrameTiming::new(60);
        timing.accumulator = 0.5;

        timing.reset();

        assert_eq!(timing.accumulator, 0.0);
    }
}
