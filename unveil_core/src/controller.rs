// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility-triggered reveal coordination.
//!
//! The [`ViewportRevealController`] turns batches of [`VisibilityEntry`]
//! values into `pending → revealed` transitions, invoking each element's
//! callback exactly on that edge. See the struct docs for the policy.

use alloc::boxed::Box;

use crate::element::{ElementId, VisibilityState};
use crate::error::RevealError;
use crate::motion::MotionMode;
use crate::options::RevealOptions;
use crate::session::{Reveal, RevealCause, RevealSession};
use crate::source::{VisibilityEntry, VisibilitySource};
use crate::trace::{
    BatchSummary, MotionChangeEvent, RegisterEvent, ResetEvent, RevealEvent, TraceSink, Tracer,
    UnregisterEvent, UnregisterReason,
};

/// Drives reveal transitions for a set of watched elements.
///
/// # Policy
///
/// - **One-shot** elements reveal on their first intersecting entry and are
///   then unobserved and dropped from the session. Further entries for
///   their (now stale) id are ignored.
/// - **Toggling** elements reveal on every entry into the viewport and go
///   back to `pending` when they leave. Only the entering edge runs the
///   callback.
/// - **Reduced motion** forces every pending element to reveal when the mode
///   switches, in registration order, before
///   [`set_motion_mode`](Self::set_motion_mode) returns. Anything revealed
///   while reduced is *pinned*: it never reverts, even after the mode
///   returns to full. Elements registered while reduced reveal on the first
///   entry delivered for them, intersecting or not.
///
/// # Failure handling
///
/// Public methods never fail. Invalid registrations and callback errors are
/// logged with `tracing`, reported to the [`TraceSink`], and absorbed; one
/// failing callback does not stop the rest of its batch.
///
/// # Usage
///
/// ```rust,ignore
/// let mut controller = ViewportRevealController::new(source);
/// controller.register(element, RevealPreset::SKILL.resolve(&attrs), |r| {
///     fill_bar(r.handle, r.payload);
///     Ok(())
/// });
/// // Platform callback:
/// controller.handle_batch(&entries);
/// ```
pub struct ViewportRevealController<V: VisibilitySource> {
    source: V,
    session: RevealSession<V::Handle>,
    motion: MotionMode,
    tracer: Tracer,
    batch_index: u64,
}

impl<V: VisibilitySource> core::fmt::Debug for ViewportRevealController<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewportRevealController")
            .field("session", &self.session)
            .field("motion", &self.motion)
            .field("batch_index", &self.batch_index)
            .finish_non_exhaustive()
    }
}

impl<V: VisibilitySource> ViewportRevealController<V> {
    /// Creates a controller in [`MotionMode::Full`].
    #[must_use]
    pub fn new(source: V) -> Self {
        Self::with_motion(source, MotionMode::Full)
    }

    /// Creates a controller starting in the given motion mode.
    ///
    /// Use this with the platform's current preference so that nothing is
    /// force-revealed by a spurious initial mode change.
    #[must_use]
    pub fn with_motion(source: V, motion: MotionMode) -> Self {
        Self {
            source,
            session: RevealSession::new(),
            motion,
            tracer: Tracer::none(),
            batch_index: 0,
        }
    }

    /// Attaches a trace sink (only dispatched with the `trace` feature).
    #[must_use]
    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.tracer = Tracer::new(sink);
        self
    }

    /// Replaces the trace sink.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    /// Returns the visibility source.
    #[must_use]
    pub fn source(&self) -> &V {
        &self.source
    }

    /// Returns the visibility source mutably.
    pub fn source_mut(&mut self) -> &mut V {
        &mut self.source
    }

    /// Returns the live session.
    #[must_use]
    pub fn session(&self) -> &RevealSession<V::Handle> {
        &self.session
    }

    /// Returns the current motion mode.
    #[must_use]
    pub fn motion_mode(&self) -> MotionMode {
        self.motion
    }

    /// Returns the state of `id`, or `None` if it is no longer watched.
    #[must_use]
    pub fn state(&self, id: ElementId) -> Option<VisibilityState> {
        self.session.state(id)
    }

    /// Returns whether `id` is still watched.
    #[must_use]
    pub fn is_registered(&self, id: ElementId) -> bool {
        self.session.contains(id)
    }

    /// Number of watched elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.session.len()
    }

    /// Returns `true` when nothing is watched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.session.is_empty()
    }

    /// Starts watching an element.
    ///
    /// `handle` may be `None` (a missing element); that, or a handle the
    /// source reports as invalid, is logged and returns `None` without
    /// touching the session. Registering a handle that is already watched
    /// re-arms it: options and callback are replaced and it goes back to
    /// `pending` under the same id.
    ///
    /// The callback never runs from inside `register`, even if the element
    /// is already on screen; the first delivered batch decides.
    pub fn register<F>(
        &mut self,
        handle: impl Into<Option<V::Handle>>,
        options: RevealOptions,
        on_reveal: F,
    ) -> Option<ElementId>
    where
        F: FnMut(&Reveal<'_, V::Handle>) -> Result<(), RevealError> + 'static,
    {
        let Some(handle) = handle.into() else {
            self.reject();
            return None;
        };
        if !self.source.is_valid(&handle) {
            self.reject();
            return None;
        }

        let (id, rearmed) = if let Some(id) = self.session.find(&handle) {
            self.source.unobserve(id);
            self.session.rearm(id, options, Box::new(on_reveal));
            (id, true)
        } else {
            (
                self.session.insert(handle, options, Box::new(on_reveal)),
                false,
            )
        };

        if let (Some(handle), Some(options)) = (self.session.handle(id), self.session.options(id)) {
            self.source
                .observe(id, handle, &options.observe_options());
            tracing::debug!(%id, threshold = options.threshold.get(), one_shot = options.one_shot, rearmed, "watching element");
            self.tracer.register(&RegisterEvent {
                id,
                threshold: options.threshold.get(),
                one_shot: options.one_shot,
                rearmed,
            });
        }
        Some(id)
    }

    /// Stops watching `id`. Stale or unknown ids are ignored.
    ///
    /// Returns whether anything was removed. Takes effect immediately: any
    /// entry for `id` in a later batch is skipped.
    pub fn unregister(&mut self, id: ElementId) -> bool {
        self.release(id, UnregisterReason::Caller)
    }

    /// Stops watching the element with the given handle, if any.
    pub fn unregister_handle(&mut self, handle: &V::Handle) -> bool {
        match self.session.find(handle) {
            Some(id) => self.unregister(id),
            None => false,
        }
    }

    /// Switches motion mode.
    ///
    /// Entering [`MotionMode::Reduced`] reveals every pending element before
    /// returning. Entering [`MotionMode::Full`] never hides anything. Setting
    /// the current mode again does nothing.
    pub fn set_motion_mode(&mut self, mode: MotionMode) {
        if mode == self.motion {
            return;
        }
        let from = self.motion;
        self.motion = mode;

        let mut forced = 0;
        if mode.is_reduced() {
            let pending = self
                .session
                .ids_in_registration_order(|s| s == VisibilityState::Pending);
            for id in pending {
                self.reveal(id, RevealCause::ReducedMotion);
                forced += 1;
            }
        }

        tracing::debug!(?from, to = ?mode, forced, "motion mode changed");
        self.tracer
            .motion_change(&MotionChangeEvent { from, to: mode, forced });
    }

    /// Processes one notification batch in delivery order.
    ///
    /// Returns a summary of what happened (also sent to the trace sink).
    pub fn handle_batch(&mut self, entries: &[VisibilityEntry]) -> BatchSummary {
        let mut summary = BatchSummary {
            batch_index: self.batch_index,
            entries: entries.len(),
            ..BatchSummary::default()
        };
        self.batch_index += 1;

        for entry in entries {
            let id = entry.id;
            let Some(state) = self.session.state(id) else {
                tracing::trace!(%id, "entry for unwatched element");
                summary.skipped += 1;
                continue;
            };

            match state {
                VisibilityState::Pending => {
                    let cause = if entry.is_intersecting {
                        RevealCause::Intersection
                    } else if self.motion.is_reduced() {
                        RevealCause::ReducedMotion
                    } else {
                        continue;
                    };
                    summary.revealed += 1;
                    if !self.reveal(id, cause) {
                        summary.failed += 1;
                    }
                }
                VisibilityState::Revealed => {
                    if entry.is_intersecting || !self.can_reset(id) {
                        continue;
                    }
                    self.session.set_state(id, VisibilityState::Pending);
                    tracing::trace!(%id, "left viewport");
                    self.tracer.reset(&ResetEvent { id });
                    summary.reset += 1;
                }
            }
        }

        self.tracer.batch(&summary);
        summary
    }

    /// Stops watching everything.
    ///
    /// The controller stays usable: later registrations are watched
    /// normally, while ids issued before this call remain stale.
    pub fn dispose(&mut self) {
        let ids = self.session.clear();
        for &id in &ids {
            self.source.unobserve(id);
            self.tracer.unregister(&UnregisterEvent {
                id,
                reason: UnregisterReason::Disposed,
            });
        }
        tracing::debug!(released = ids.len(), "session disposed");
    }

    // -- Internals --

    fn reject(&mut self) {
        let err = RevealError::InvalidElement;
        tracing::warn!(error = %err, "skipping registration");
        self.tracer.error(&err);
    }

    /// Runs the reveal edge for a pending element. Returns `false` if the
    /// callback failed.
    fn reveal(&mut self, id: ElementId, cause: RevealCause) -> bool {
        let motion = self.motion;
        self.tracer.reveal(&RevealEvent { id, cause, motion });

        let result = self.session.fire(id, cause, motion);
        self.session.set_state(id, VisibilityState::Revealed);
        if motion.is_reduced() {
            self.session.pin(id);
        }

        let ok = match result {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%id, error = %err, "reveal callback failed");
                self.tracer.error(&err);
                false
            }
        };

        if self.session.options(id).is_some_and(|o| o.one_shot) {
            self.release(id, UnregisterReason::Completed);
        }
        ok
    }

    fn can_reset(&self, id: ElementId) -> bool {
        !self.motion.is_reduced()
            && !self.session.is_pinned(id)
            && self.session.options(id).is_some_and(|o| !o.one_shot)
    }

    fn release(&mut self, id: ElementId, reason: UnregisterReason) -> bool {
        if !self.session.contains(id) {
            return false;
        }
        self.source.unobserve(id);
        self.session.remove(id);
        tracing::trace!(%id, ?reason, "released element");
        self.tracer.unregister(&UnregisterEvent { id, reason });
        true
    }
}
