//! Normalized event speed from device timestamps.
//!
//! Device events carry kernel timestamps in microseconds. Speed is the
//! frame's movement magnitude divided by the time since the previous frame
//! of the same movement type, in counts per millisecond, so curves see the
//! same input scale regardless of device report rate.

use openaccel_settings::MovementType;

/// Divisor used when no usable inter-frame delta exists, in milliseconds.
///
/// 7ms approximates one frame of a typical 125Hz device, so the first
/// sample after attaching lands in a plausible range instead of spiking.
pub const FALLBACK_DT_MS: f64 = 7.0;

/// Deltas above this are stale (device idle, not a fast hand), in milliseconds.
const SANE_DT_CEILING_MS: f64 = 1000.0;

/// Per-movement-type inter-frame timing state.
#[derive(Debug, Default)]
pub struct SpeedTracker {
    motion_last_us: Option<u64>,
    scroll_last_us: Option<u64>,
}

impl SpeedTracker {
    /// Create a tracker with no timing history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, movement: MovementType) -> &mut Option<u64> {
        match movement {
            MovementType::Motion => &mut self.motion_last_us,
            MovementType::Scroll => &mut self.scroll_last_us,
        }
    }

    /// Turn one frame into a speed sample, updating timing state.
    ///
    /// The stored timestamp always becomes `timestamp_us`, even for frames
    /// that produce no sample, so a clock hiccup heals on the next frame.
    /// Returns `None` when the frame is dropped:
    ///
    /// - out-of-order or duplicate timestamps (delta would be <= 0)
    ///
    /// A first frame (no history) and a frame after more than one second
    /// of idle both use [`FALLBACK_DT_MS`] as the divisor.
    pub fn speed(&mut self, movement: MovementType, timestamp_us: u64, delta: f64) -> Option<f64> {
        let slot = self.slot_mut(movement);
        let previous = slot.replace(timestamp_us);

        let dt_ms = match previous {
            None => FALLBACK_DT_MS,
            Some(last) => {
                let dt_us = timestamp_us.checked_sub(last)?;
                if dt_us == 0 {
                    return None;
                }
                let dt_ms = dt_us as f64 / 1000.0;
                if dt_ms > SANE_DT_CEILING_MS {
                    FALLBACK_DT_MS
                } else {
                    dt_ms
                }
            }
        };

        Some(delta / dt_ms)
    }

    /// Forget all timing history, as after attaching to a device.
    pub fn reset(&mut self) {
        self.motion_last_us = None;
        self.scroll_last_us = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_first_frame_uses_fallback_divisor() {
        let mut tracker = SpeedTracker::new();
        let speed = tracker.speed(MovementType::Motion, 1_000_000, 14.0);
        assert!(matches!(speed, Some(s) if close(s, 14.0 / FALLBACK_DT_MS)));
    }

    #[test]
    fn test_steady_cadence() {
        let mut tracker = SpeedTracker::new();
        tracker.speed(MovementType::Motion, 1_000_000, 5.0);

        let speed = tracker.speed(MovementType::Motion, 1_010_000, 5.0);
        assert!(matches!(speed, Some(s) if close(s, 0.5)), "5 counts / 10ms");

        let speed = tracker.speed(MovementType::Motion, 1_012_000, 8.0);
        assert!(matches!(speed, Some(s) if close(s, 4.0)), "8 counts / 2ms");
    }

    #[test]
    fn test_duplicate_timestamp_is_dropped() {
        let mut tracker = SpeedTracker::new();
        tracker.speed(MovementType::Motion, 1_000_000, 5.0);
        assert_eq!(tracker.speed(MovementType::Motion, 1_000_000, 5.0), None);
    }

    #[test]
    fn test_out_of_order_frame_is_dropped_but_recorded() {
        let mut tracker = SpeedTracker::new();
        tracker.speed(MovementType::Motion, 1_050_000, 5.0);

        // Older timestamp: dropped, but it becomes the new reference.
        assert_eq!(tracker.speed(MovementType::Motion, 1_040_000, 5.0), None);

        let speed = tracker.speed(MovementType::Motion, 1_050_000, 5.0);
        assert!(matches!(speed, Some(s) if close(s, 0.5)), "5 counts / 10ms");
    }

    #[test]
    fn test_idle_gap_falls_back() {
        let mut tracker = SpeedTracker::new();
        tracker.speed(MovementType::Motion, 1_000_000, 5.0);

        // 2 seconds later: the gap says nothing about hand speed.
        let speed = tracker.speed(MovementType::Motion, 3_000_000, 7.0);
        assert!(matches!(speed, Some(s) if close(s, 1.0)));
    }

    #[test]
    fn test_movement_types_have_independent_history() {
        let mut tracker = SpeedTracker::new();
        tracker.speed(MovementType::Motion, 1_000_000, 5.0);

        // First scroll frame still uses the fallback.
        let speed = tracker.speed(MovementType::Scroll, 1_010_000, 1.0);
        assert!(matches!(speed, Some(s) if close(s, 1.0 / FALLBACK_DT_MS)));

        // And motion history is untouched by scroll frames.
        let speed = tracker.speed(MovementType::Motion, 1_020_000, 10.0);
        assert!(matches!(speed, Some(s) if close(s, 0.5)));
    }

    #[test]
    fn test_reset_clears_history() {
        let mut tracker = SpeedTracker::new();
        tracker.speed(MovementType::Motion, 1_000_000, 5.0);
        tracker.reset();

        let speed = tracker.speed(MovementType::Motion, 1_010_000, 7.0);
        assert!(matches!(speed, Some(s) if close(s, 7.0 / FALLBACK_DT_MS)));
    }
}
