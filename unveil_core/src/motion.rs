// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Motion-reduction preference.

/// Process-wide animation preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MotionMode {
    /// Animations run normally.
    #[default]
    Full,
    /// The user asked for non-essential motion to be suppressed.
    Reduced,
}

impl MotionMode {
    /// Maps a `prefers-reduced-motion: reduce` match result to a mode.
    #[inline]
    #[must_use]
    pub const fn from_prefers_reduced(reduced: bool) -> Self {
        if reduced { Self::Reduced } else { Self::Full }
    }

    /// Returns `true` for [`Reduced`](Self::Reduced).
    #[inline]
    #[must_use]
    pub const fn is_reduced(self) -> bool {
        matches!(self, Self::Reduced)
    }
}

/// Source of the platform's reduced-motion preference.
///
/// Only the current value is pulled through this trait. Changes are pushed:
/// the backend that owns the platform listener calls
/// [`ViewportRevealController::set_motion_mode`](crate::controller::ViewportRevealController::set_motion_mode)
/// when the preference flips.
pub trait MotionPreference {
    /// Returns whether reduced motion is currently requested.
    fn prefers_reduced(&self) -> bool;

    /// Returns the current preference as a [`MotionMode`].
    fn mode(&self) -> MotionMode {
        MotionMode::from_prefers_reduced(self.prefers_reduced())
    }
}

impl MotionPreference for MotionMode {
    fn prefers_reduced(&self) -> bool {
        self.is_reduced()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_media_query_result() {
        assert_eq!(MotionMode::from_prefers_reduced(true), MotionMode::Reduced);
        assert_eq!(MotionMode::from_prefers_reduced(false), MotionMode::Full);
        assert_eq!(MotionMode::Reduced.mode(), MotionMode::Reduced);
    }
}
