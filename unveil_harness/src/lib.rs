// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic test doubles for the reveal controller.
//!
//! - [`FakeVisibilitySource`]: records `observe`/`unobserve` calls and lets a
//!   test script batches by handle instead of by id.
//! - [`FakeMotionPreference`]: a settable reduced-motion flag.
//! - [`RevealProbe`]: builds callbacks that log (and optionally fail) reveals.

#![no_std]

extern crate alloc;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use unveil_core::element::ElementId;
use unveil_core::error::RevealError;
use unveil_core::motion::MotionPreference;
use unveil_core::options::{ObserveOptions, RevealPayload};
use unveil_core::session::{Reveal, RevealCause};
use unveil_core::source::{VisibilityEntry, VisibilitySource};

/// Handle type used by the fake source. Names stand in for DOM elements.
pub type FakeHandle = &'static str;

/// Name that the fake source rejects as invalid.
pub const DETACHED: FakeHandle = "";

/// One `observe` call.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    /// Id assigned by the controller.
    pub id: ElementId,
    /// Handle passed in.
    pub handle: FakeHandle,
    /// Threshold requested.
    pub threshold: f32,
    /// Root margin requested.
    pub root_margin: String,
}

/// A [`VisibilitySource`] that only records what it is asked to do.
#[derive(Debug, Default)]
pub struct FakeVisibilitySource {
    observing: Vec<Observation>,
    observe_calls: usize,
    unobserved: Vec<ElementId>,
}

impl FakeVisibilitySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements currently observed, in observe order.
    #[must_use]
    pub fn observing(&self) -> &[Observation] {
        &self.observing
    }

    /// Returns whether `id` is currently observed.
    #[must_use]
    pub fn is_observing(&self, id: ElementId) -> bool {
        self.observing.iter().any(|o| o.id == id)
    }

    /// Total `observe` calls so far, including re-arms.
    #[must_use]
    pub fn observe_calls(&self) -> usize {
        self.observe_calls
    }

    /// Every `unobserve` call so far, in order.
    #[must_use]
    pub fn unobserved(&self) -> &[ElementId] {
        &self.unobserved
    }

    /// Id currently observed for `handle`.
    #[must_use]
    pub fn id_of(&self, handle: FakeHandle) -> Option<ElementId> {
        self.observing
            .iter()
            .find(|o| o.handle == handle)
            .map(|o| o.id)
    }

    /// Builds a batch from `(handle, is_intersecting)` pairs.
    ///
    /// Handles that are not observed are dropped, the way a real observer
    /// never reports elements it does not watch.
    #[must_use]
    pub fn batch(&self, entries: &[(FakeHandle, bool)]) -> Vec<VisibilityEntry> {
        entries
            .iter()
            .filter_map(|&(handle, is_intersecting)| {
                Some(VisibilityEntry {
                    id: self.id_of(handle)?,
                    is_intersecting,
                })
            })
            .collect()
    }
}

impl VisibilitySource for FakeVisibilitySource {
    type Handle = FakeHandle;

    fn is_valid(&self, handle: &FakeHandle) -> bool {
        !handle.is_empty()
    }

    fn observe(&mut self, id: ElementId, handle: &FakeHandle, options: &ObserveOptions<'_>) {
        self.observe_calls += 1;
        self.observing.push(Observation {
            id,
            handle: *handle,
            threshold: options.threshold.get(),
            root_margin: options.root_margin.into(),
        });
    }

    fn unobserve(&mut self, id: ElementId) {
        self.unobserved.push(id);
        self.observing.retain(|o| o.id != id);
    }
}

/// A reduced-motion preference flipped by the test.
#[derive(Debug, Default)]
pub struct FakeMotionPreference {
    reduced: Cell<bool>,
}

impl FakeMotionPreference {
    /// Creates a preference with the given initial value.
    #[must_use]
    pub fn new(reduced: bool) -> Self {
        Self {
            reduced: Cell::new(reduced),
        }
    }

    /// Changes the preference.
    pub fn set(&self, reduced: bool) {
        self.reduced.set(reduced);
    }
}

impl MotionPreference for FakeMotionPreference {
    fn prefers_reduced(&self) -> bool {
        self.reduced.get()
    }
}

/// One observed callback invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Handle the callback ran for.
    pub handle: FakeHandle,
    /// Trigger.
    pub cause: RevealCause,
    /// Payload resolved at registration.
    pub payload: RevealPayload,
}

/// Shared log of reveal callbacks.
#[derive(Clone, Debug, Default)]
pub struct RevealProbe {
    log: Rc<RefCell<Vec<Invocation>>>,
}

impl RevealProbe {
    /// Creates an empty probe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that logs and succeeds.
    pub fn callback(&self) -> impl FnMut(&Reveal<'_, FakeHandle>) -> Result<(), RevealError> + 'static {
        let log = Rc::clone(&self.log);
        move |r| {
            log.borrow_mut().push(Invocation {
                handle: *r.handle,
                cause: r.cause,
                payload: r.payload,
            });
            Ok(())
        }
    }

    /// A callback that logs and then fails with `message`.
    pub fn failing(
        &self,
        message: &'static str,
    ) -> impl FnMut(&Reveal<'_, FakeHandle>) -> Result<(), RevealError> + 'static {
        let log = Rc::clone(&self.log);
        move |r| {
            log.borrow_mut().push(Invocation {
                handle: *r.handle,
                cause: r.cause,
                payload: r.payload,
            });
            tracing::debug!(handle = *r.handle, "probe callback failing on purpose");
            Err(RevealError::callback(r.id, message))
        }
    }

    /// Every invocation so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.log.borrow().clone()
    }

    /// Handles in invocation order.
    #[must_use]
    pub fn handles(&self) -> Vec<FakeHandle> {
        self.log.borrow().iter().map(|i| i.handle).collect()
    }

    /// Number of invocations for `handle`.
    #[must_use]
    pub fn count(&self, handle: FakeHandle) -> usize {
        self.log.borrow().iter().filter(|i| i.handle == handle).count()
    }

    /// Total invocations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.log.borrow().len()
    }
}
