//! Fixed-step clock
//!
//! Accumulates frame time and releases at most one simulation step per
//! frame. The remainder past a whole step is carried into the next frame so
//! the simulation does not drift against the wall clock.

/// Accumulator deciding when the next tick runs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(step: f32) -> Self {
        Self {
            step: step.max(f32::EPSILON),
            accumulator: 0.0,
        }
    }

    /// Seconds per simulation step
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Time banked toward the next step
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Add elapsed wall time; true when a step should run this frame
    ///
    /// Only one step is released even after a long stall; whole extra steps
    /// are dropped and the fractional remainder kept.
    pub fn advance(&mut self, elapsed: f32) -> bool {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed;
        }
        if self.accumulator < self.step {
            return false;
        }
        self.accumulator %= self.step;
        true
    }
}
