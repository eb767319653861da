//! Lux-to-brightness mapping, smoothing, and rate limiting (spec §4.4
//! "Mapping", Testable Property 7, Scenario 4).

use std::collections::VecDeque;

use sign_core::RenderBrightness;

const WINDOW_SIZE: usize = 10;
const MAX_LUX: f64 = 400.0;
const GAMMA: f64 = 0.6;
const MAX_STEP: i64 = 5;

/// Tracks the rolling mean of recent mapped-lux samples and rate-limits
/// the published brightness.
pub struct BrightnessMapper {
    window: VecDeque<i64>,
    current: RenderBrightness,
}

impl BrightnessMapper {
    /// Starts from `current` (spec §8 scenario 4 starts from `current = 1`).
    #[must_use]
    pub fn new(current: RenderBrightness) -> Self {
        Self { window: VecDeque::with_capacity(WINDOW_SIZE), current }
    }

    #[must_use]
    pub fn current(&self) -> RenderBrightness {
        self.current
    }

    /// Feeds one lux reading through the mapping pipeline. Returns the new
    /// current brightness if it changed, or `None` if the rolling target
    /// matched the current value exactly (spec step 4: "if zero, sleep 1 s
    /// and return" — the sleep is the caller's responsibility).
    pub fn push_lux(&mut self, lux: u32) -> Option<RenderBrightness> {
        let normalized = (f64::from(lux) / MAX_LUX).min(1.0);
        let mapped = normalized.powf(GAMMA) * 99.0 + 1.0;

        if self.window.len() == WINDOW_SIZE {
            self.window.pop_front();
        }
        self.window.push_back(mapped.round() as i64);

        let sum: i64 = self.window.iter().sum();
        #[allow(clippy::cast_precision_loss)]
        let target = (sum as f64 / self.window.len() as f64).round() as i64;

        let diff = target - i64::from(self.current.get());
        if diff == 0 {
            return None;
        }

        let step = diff.signum() * diff.abs().min(MAX_STEP);
        self.current = RenderBrightness::clamped(i64::from(self.current.get()) + step);
        Some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_converges_in_steps_of_at_most_five() {
        let mut mapper = BrightnessMapper::new(RenderBrightness::clamped(1));
        let mut sequence = vec![1u8];
        for _ in 0..40 {
            if let Some(b) = mapper.push_lux(10_000) {
                sequence.push(b.get());
            }
        }
        for pair in sequence.windows(2) {
            let step = i64::from(pair[1]) - i64::from(pair[0]);
            assert!(step.abs() <= MAX_STEP, "step {step} exceeds limit");
        }
        assert_eq!(*sequence.last().unwrap(), 100);
    }

    #[test]
    fn zero_diff_reports_no_change() {
        let mut mapper = BrightnessMapper::new(RenderBrightness::clamped(1));
        // Lux of 0 maps to brightness 1, matching the starting current.
        assert_eq!(mapper.push_lux(0), None);
    }

    #[test]
    fn stays_within_bounds_for_arbitrary_input() {
        let mut mapper = BrightnessMapper::new(RenderBrightness::clamped(50));
        for lux in [0u32, 1, 50, 100_000, 0, 999_999, 1] {
            if let Some(b) = mapper.push_lux(lux) {
                assert!((RenderBrightness::MIN..=RenderBrightness::MAX).contains(&b.get()));
            }
        }
    }
}
