// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear tweens for reveal effects, plus number formatting for counters.
//!
//! A [`Tween`] is sampled by the caller on each animation frame with the
//! elapsed time since it started. Under reduced motion the duration collapses
//! to zero and the first sample lands on the end value.

use alloc::format;
use alloc::string::String;

use crate::motion::MotionMode;
use crate::time::Duration;

/// Duration of a stat counter counting up.
pub const COUNTER_DURATION: Duration = Duration::from_millis(1200);

/// Duration of a skill label counting up.
pub const LABEL_DURATION: Duration = Duration::from_millis(700);

/// Duration of a skill bar filling.
pub const BAR_DURATION: Duration = Duration::from_millis(900);

/// Linear interpolation from `from` to `to` over `duration`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    /// Start value.
    pub from: f64,
    /// End value.
    pub to: f64,
    /// Total duration. Zero means "jump to the end".
    pub duration: Duration,
}

impl Tween {
    /// Creates a tween.
    #[must_use]
    pub const fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Returns this tween with its duration dropped under reduced motion.
    #[must_use]
    pub const fn for_motion(self, motion: MotionMode) -> Self {
        if motion.is_reduced() {
            Self {
                duration: Duration::ZERO,
                ..self
            }
        } else {
            self
        }
    }

    /// Progress in `0.0..=1.0` after `elapsed`.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_millis_f64() / self.duration.as_millis_f64()).clamp(0.0, 1.0)
    }

    /// Interpolated value after `elapsed`.
    #[must_use]
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let t = self.progress(elapsed);
        self.from + (self.to - self.from) * t
    }

    /// Interpolated value rounded half-up to a non-negative integer.
    #[must_use]
    pub fn rounded_at(&self, elapsed: Duration) -> u64 {
        let v = self.value_at(elapsed).max(0.0) + 0.5;
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "non-negative by construction; saturating cast"
        )]
        let out = v as u64;
        out
    }

    /// Returns `true` once the end value has been reached.
    #[must_use]
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.progress(elapsed) >= 1.0
    }
}

/// Formats a count compactly: `1000 → "1k"`, `1790 → "1.8k"`, `950 → "950"`.
///
/// Only counts below 1000 are grouped. The thousands part is written as a
/// plain number, so a million reads `"1000k"`.
#[must_use]
pub fn format_compact(n: u64) -> String {
    if n < 1000 {
        return format_grouped(n);
    }
    let tenths = (n + 50) / 100;
    let (whole, frac) = (tenths / 10, tenths % 10);
    if frac == 0 {
        format!("{whole}k")
    } else {
        format!("{whole}.{frac}k")
    }
}

/// Formats a count with `,` thousands separators.
#[must_use]
pub fn format_grouped(n: u64) -> String {
    let digits = format!("{n}");
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_interpolates_and_clamps() {
        let t = Tween::new(0.0, 100.0, Duration::from_millis(1000));
        assert_eq!(t.value_at(Duration::ZERO), 0.0);
        assert_eq!(t.value_at(Duration::from_millis(250)), 25.0);
        assert_eq!(t.value_at(Duration::from_millis(5000)), 100.0);
        assert!(!t.is_finished(Duration::from_millis(999)));
        assert!(t.is_finished(Duration::from_millis(1000)));
    }

    #[test]
    fn reduced_motion_jumps_to_end() {
        let t = Tween::new(0.0, 42.0, COUNTER_DURATION).for_motion(MotionMode::Reduced);
        assert_eq!(t.rounded_at(Duration::ZERO), 42);
        assert!(t.is_finished(Duration::ZERO));

        let full = Tween::new(0.0, 42.0, COUNTER_DURATION).for_motion(MotionMode::Full);
        assert_eq!(full.duration, COUNTER_DURATION);
    }

    #[test]
    fn rounding_is_half_up() {
        let t = Tween::new(0.0, 3.0, Duration::from_millis(2));
        assert_eq!(t.rounded_at(Duration::from_millis(1)), 2, "1.5 rounds up");
    }

    #[test]
    fn compact_formatting() {
        assert_eq!(format_compact(0), "0");
        assert_eq!(format_compact(999), "999");
        assert_eq!(format_compact(1000), "1k");
        assert_eq!(format_compact(1790), "1.8k");
        assert_eq!(format_compact(1999), "2k");
        assert_eq!(format_compact(25_340), "25.3k");
    }

    #[test]
    fn compact_thousands_part_is_ungrouped() {
        assert_eq!(format_compact(1_234_567), "1234.6k");
        assert_eq!(format_compact(1_000_000), "1000k");
    }

    #[test]
    fn grouped_formatting() {
        assert_eq!(format_grouped(7), "7");
        assert_eq!(format_grouped(1234), "1,234");
        assert_eq!(format_grouped(1_000_000), "1,000,000");
    }
}
