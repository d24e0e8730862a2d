//! Adaptive axis scaling for curve sampling.
//!
//! The curve editor plots the unit square, but devices produce speeds well
//! above 1 count/ms. The scale tracks the fastest speed seen so far and
//! stretches the sampled function's axes to match, so the full plot width
//! always covers the user's actual speed range.

/// Tracks the input axis top and derives the output axis top.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedScale {
    x_top: f64,
    y_multiplier: f64,
}

impl Default for SpeedScale {
    fn default() -> Self {
        Self {
            x_top: 1.0,
            y_multiplier: 1.0,
        }
    }
}

impl SpeedScale {
    /// Create a scale covering speeds up to 1 count/ms with unity output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current input axis top, in counts per millisecond.
    #[must_use]
    pub fn x_top(&self) -> f64 {
        self.x_top
    }

    /// Output axis top: input top times the output multiplier.
    #[must_use]
    pub fn y_top(&self) -> f64 {
        self.x_top * self.y_multiplier
    }

    /// Feed an observed speed; the input top rises to cover it.
    ///
    /// Returns `true` if the top changed, which means the sampled function
    /// is stale and a redraw/re-apply is due. Non-finite speeds are
    /// ignored.
    pub fn observe(&mut self, speed: f64) -> bool {
        if !speed.is_finite() || speed <= self.x_top {
            return false;
        }
        self.x_top = speed;
        true
    }

    /// Set the output multiplier (sensitivity), pinned to a positive value.
    pub fn set_y_multiplier(&mut self, multiplier: f64) {
        if multiplier.is_finite() && multiplier > 0.0 {
            self.y_multiplier = multiplier;
        }
    }

    /// The current output multiplier.
    #[must_use]
    pub fn y_multiplier(&self) -> f64 {
        self.y_multiplier
    }

    /// Shrink back to the initial range, as when switching movement types.
    pub fn reset(&mut self) {
        self.x_top = 1.0;
    }
}
