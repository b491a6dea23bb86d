// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Watched-element identity and visibility state.

use core::fmt;

/// A handle to a watched element in a [`RevealSession`](crate::session::RevealSession).
///
/// Contains both a slot index and a generation counter so that a handle held
/// past [`unregister`](crate::controller::ViewportRevealController::unregister)
/// or [`dispose`](crate::controller::ViewportRevealController::dispose) is
/// recognized as stale and ignored rather than aliasing a newer element.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl ElementId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Builds a handle from raw parts.
    ///
    /// Backends use this to round-trip ids through platform storage (for
    /// example a DOM attribute). A forged id that does not match a live slot
    /// is simply ignored by the session.
    #[inline]
    #[must_use]
    pub const fn from_raw(idx: u32, generation: u32) -> Self {
        Self { idx, generation }
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({}@gen{})", self.idx, self.generation)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.idx, self.generation)
    }
}

/// Presentation state of a watched element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VisibilityState {
    /// Not yet revealed (or reset after leaving the viewport).
    #[default]
    Pending,
    /// Revealed; the caller's callback has run for the current edge.
    Revealed,
}

impl VisibilityState {
    /// Returns `true` for [`Revealed`](Self::Revealed).
    #[inline]
    #[must_use]
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }
}
