// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event instrumentation for the reveal controller.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! controller calls as elements move through their lifecycle. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] owns an optional boxed sink. When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing and the sink passed to
//! [`Tracer::new`] is dropped. When **on**, each method performs a single
//! `Option` branch before dispatching.
//!
//! Independently of the sink, the controller always logs through `tracing`.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use crate::element::ElementId;
use crate::error::RevealError;
use crate::motion::MotionMode;
use crate::session::RevealCause;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why an element left the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnregisterReason {
    /// The caller asked for it.
    Caller,
    /// A one-shot element completed its reveal.
    Completed,
    /// The whole session was disposed.
    Disposed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when an element starts being watched (or is re-armed).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegisterEvent {
    /// The element's id.
    pub id: ElementId,
    /// Trigger threshold.
    pub threshold: f32,
    /// One-shot policy.
    pub one_shot: bool,
    /// `true` when an already-watched handle was registered again.
    pub rearmed: bool,
}

/// Emitted on every `pending → revealed` edge, before the callback runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevealEvent {
    /// The element's id.
    pub id: ElementId,
    /// What triggered the reveal.
    pub cause: RevealCause,
    /// Motion mode at reveal time.
    pub motion: MotionMode,
}

/// Emitted when a toggling element leaves the viewport and returns to
/// `pending`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResetEvent {
    /// The element's id.
    pub id: ElementId,
}

/// Emitted when an element leaves the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnregisterEvent {
    /// The element's id.
    pub id: ElementId,
    /// Why it left.
    pub reason: UnregisterReason,
}

/// Emitted when the motion mode actually changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionChangeEvent {
    /// Previous mode.
    pub from: MotionMode,
    /// New mode.
    pub to: MotionMode,
    /// Number of pending elements force-revealed by the change.
    pub forced: usize,
}

/// Emitted once per processed notification batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchSummary {
    /// Monotonic batch counter.
    pub batch_index: u64,
    /// Entries delivered.
    pub entries: usize,
    /// `pending → revealed` edges.
    pub revealed: usize,
    /// `revealed → pending` edges.
    pub reset: usize,
    /// Entries for stale or unknown ids.
    pub skipped: usize,
    /// Callbacks that returned an error.
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// TraceSink
// ---------------------------------------------------------------------------

/// Receives controller lifecycle events.
///
/// Every method has a default no-op body.
pub trait TraceSink {
    /// An element was registered or re-armed.
    fn on_register(&mut self, e: &RegisterEvent) {
        _ = e;
    }

    /// An element is being revealed.
    fn on_reveal(&mut self, e: &RevealEvent) {
        _ = e;
    }

    /// A toggling element went back to `pending`.
    fn on_reset(&mut self, e: &ResetEvent) {
        _ = e;
    }

    /// An element left the session.
    fn on_unregister(&mut self, e: &UnregisterEvent) {
        _ = e;
    }

    /// The motion mode changed.
    fn on_motion_change(&mut self, e: &MotionChangeEvent) {
        _ = e;
    }

    /// A notification batch finished processing.
    fn on_batch(&mut self, s: &BatchSummary) {
        _ = s;
    }

    /// A registration or callback error was absorbed.
    fn on_error(&mut self, err: &RevealError) {
        _ = err;
    }
}

/// A sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Shared sinks let the caller keep reading what the controller recorded.
impl<T: TraceSink + ?Sized> TraceSink for Rc<RefCell<T>> {
    fn on_register(&mut self, e: &RegisterEvent) {
        self.borrow_mut().on_register(e);
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        self.borrow_mut().on_reveal(e);
    }

    fn on_reset(&mut self, e: &ResetEvent) {
        self.borrow_mut().on_reset(e);
    }

    fn on_unregister(&mut self, e: &UnregisterEvent) {
        self.borrow_mut().on_unregister(e);
    }

    fn on_motion_change(&mut self, e: &MotionChangeEvent) {
        self.borrow_mut().on_motion_change(e);
    }

    fn on_batch(&mut self, s: &BatchSummary) {
        self.borrow_mut().on_batch(s);
    }

    fn on_error(&mut self, err: &RevealError) {
        self.borrow_mut().on_error(err);
    }
}

// ---------------------------------------------------------------------------
// Tracer
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional boxed [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        #[cfg(feature = "trace")]
        let attached = self.sink.is_some();
        #[cfg(not(feature = "trace"))]
        let attached = false;
        f.debug_struct("Tracer")
            .field("attached", &attached)
            .finish()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Emits a [`RegisterEvent`].
    #[inline]
    pub fn register(&mut self, e: &RegisterEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_register(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RevealEvent`].
    #[inline]
    pub fn reveal(&mut self, e: &RevealEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reveal(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ResetEvent`].
    #[inline]
    pub fn reset(&mut self, e: &ResetEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reset(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UnregisterEvent`].
    #[inline]
    pub fn unregister(&mut self, e: &UnregisterEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_unregister(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MotionChangeEvent`].
    #[inline]
    pub fn motion_change(&mut self, e: &MotionChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_motion_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BatchSummary`].
    #[inline]
    pub fn batch(&mut self, s: &BatchSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_batch(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Reports an absorbed error.
    #[inline]
    pub fn error(&mut self, err: &RevealError) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_error(err);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = err;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reveal() -> RevealEvent {
        RevealEvent {
            id: ElementId::from_raw(1, 0),
            cause: RevealCause::Intersection,
            motion: MotionMode::Full,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_reveal(&sample_reveal());
        sink.on_batch(&BatchSummary::default());
        sink.on_error(&RevealError::InvalidElement);
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.reveal(&sample_reveal());
        tracer.batch(&BatchSummary::default());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_shared_sink() {
        use alloc::vec::Vec;

        #[derive(Default)]
        struct RecordingSink {
            reveals: Vec<ElementId>,
        }
        impl TraceSink for RecordingSink {
            fn on_reveal(&mut self, e: &RevealEvent) {
                self.reveals.push(e.id);
            }
        }

        let shared = Rc::new(RefCell::new(RecordingSink::default()));
        let mut tracer = Tracer::new(Box::new(Rc::clone(&shared)));
        tracer.reveal(&sample_reveal());
        drop(tracer);
        assert_eq!(shared.borrow().reveals, &[ElementId::from_raw(1, 0)]);
    }
}
