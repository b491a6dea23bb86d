// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays storage for the live set of watched elements.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::element::{ElementId, VisibilityState};
use crate::error::RevealError;
use crate::motion::MotionMode;
use crate::options::{RevealOptions, RevealPayload};

/// Why an element was revealed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RevealCause {
    /// The element crossed its threshold.
    Intersection,
    /// Reduced motion forced the reveal.
    ReducedMotion,
}

/// What a reveal callback receives.
#[derive(Debug)]
pub struct Reveal<'a, H> {
    /// The revealed element's id.
    pub id: ElementId,
    /// The caller's platform handle.
    pub handle: &'a H,
    /// Payload resolved at registration.
    pub payload: RevealPayload,
    /// Why the reveal happened.
    pub cause: RevealCause,
    /// Motion mode at the time of the reveal. Callbacks use this to skip
    /// their own transitions when it is [`MotionMode::Reduced`].
    pub motion: MotionMode,
}

/// Boxed reveal callback.
///
/// Returning `Err` does not stop the batch; the failure is logged and the
/// element still counts as revealed.
pub type RevealCallback<H> = Box<dyn FnMut(&Reveal<'_, H>) -> Result<(), RevealError>>;

/// Struct-of-arrays storage for watched elements.
///
/// Elements are addressed by [`ElementId`] handles. Each element occupies a
/// slot in parallel arrays. Removed elements are recycled via a free list,
/// and generation counters make old handles fail lookups.
pub struct RevealSession<H> {
    // -- Identity --
    pub(crate) handle: Vec<Option<H>>,

    // -- Per-element configuration --
    pub(crate) options: Vec<RevealOptions>,
    pub(crate) callback: Vec<Option<RevealCallback<H>>>,

    // -- Per-element state --
    pub(crate) state: Vec<VisibilityState>,
    pub(crate) pinned: Vec<bool>,
    pub(crate) seq: Vec<u64>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) live: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) next_seq: u64,
    pub(crate) count: usize,
}

impl<H> fmt::Debug for RevealSession<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealSession")
            .field("len", &self.count)
            .field("slots", &self.live.len())
            .field("free", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<H> Default for RevealSession<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RevealSession<H> {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handle: Vec::new(),
            options: Vec::new(),
            callback: Vec::new(),
            state: Vec::new(),
            pinned: Vec::new(),
            seq: Vec::new(),
            generation: Vec::new(),
            live: Vec::new(),
            free_list: Vec::new(),
            next_seq: 0,
            count: 0,
        }
    }

    /// Number of elements currently watched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` when nothing is watched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    // -- Allocation API --

    /// Adds an element in the `pending` state and returns its handle.
    pub fn insert(
        &mut self,
        handle: H,
        options: RevealOptions,
        callback: RevealCallback<H>,
    ) -> ElementId {
        let seq = self.next_seq;
        self.next_seq += 1;

        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; its generation was bumped on removal.
            let i = idx as usize;
            self.handle[i] = Some(handle);
            self.options[i] = options;
            self.callback[i] = Some(callback);
            self.state[i] = VisibilityState::Pending;
            self.pinned[i] = false;
            self.seq[i] = seq;
            self.live[i] = true;
            idx
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "more than u32::MAX watched elements is not a supported use"
            )]
            let idx = self.live.len() as u32;
            self.handle.push(Some(handle));
            self.options.push(options);
            self.callback.push(Some(callback));
            self.state.push(VisibilityState::Pending);
            self.pinned.push(false);
            self.seq.push(seq);
            self.generation.push(0);
            self.live.push(true);
            idx
        };

        self.count += 1;
        ElementId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Replaces an element's options and callback and resets it to
    /// `pending`. Returns `false` for stale ids.
    pub fn rearm(
        &mut self,
        id: ElementId,
        options: RevealOptions,
        callback: RevealCallback<H>,
    ) -> bool {
        let Some(i) = self.slot(id) else {
            return false;
        };
        self.options[i] = options;
        self.callback[i] = Some(callback);
        self.state[i] = VisibilityState::Pending;
        self.pinned[i] = false;
        true
    }

    /// Removes an element, freeing its slot for reuse.
    ///
    /// Returns `false` (and does nothing) for stale or unknown ids.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let Some(i) = self.slot(id) else {
            return false;
        };
        self.handle[i] = None;
        self.callback[i] = None;
        self.live[i] = false;
        // Bump generation so old handles immediately fail lookups.
        self.generation[i] = self.generation[i].wrapping_add(1);
        self.free_list.push(id.idx);
        self.count -= 1;
        true
    }

    /// Removes every element and returns their ids in registration order.
    pub fn clear(&mut self) -> Vec<ElementId> {
        let ids = self.ids_in_registration_order(|_| true);
        for id in &ids {
            self.remove(*id);
        }
        ids
    }

    /// Returns whether the given id refers to a live element.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.slot(id).is_some()
    }

    // -- Lookup API --

    /// Returns the current state, or `None` for stale ids.
    #[must_use]
    pub fn state(&self, id: ElementId) -> Option<VisibilityState> {
        self.slot(id).map(|i| self.state[i])
    }

    /// Returns the element's options, or `None` for stale ids.
    #[must_use]
    pub fn options(&self, id: ElementId) -> Option<&RevealOptions> {
        self.slot(id).map(|i| &self.options[i])
    }

    /// Returns the caller's handle, or `None` for stale ids.
    #[must_use]
    pub fn handle(&self, id: ElementId) -> Option<&H> {
        self.slot(id).and_then(|i| self.handle[i].as_ref())
    }

    /// Returns whether the element was revealed by reduced motion and can no
    /// longer revert to `pending`.
    #[must_use]
    pub fn is_pinned(&self, id: ElementId) -> bool {
        self.slot(id).is_some_and(|i| self.pinned[i])
    }

    /// Live ids matching `filter`, ordered by registration.
    #[must_use]
    pub fn ids_in_registration_order(&self, filter: impl Fn(VisibilityState) -> bool) -> Vec<ElementId> {
        let mut slots: Vec<usize> = (0..self.live.len())
            .filter(|&i| self.live[i] && filter(self.state[i]))
            .collect();
        slots.sort_unstable_by_key(|&i| self.seq[i]);
        slots.into_iter().map(|i| self.id_at(i)).collect()
    }

    // -- Mutation used by the controller --

    pub(crate) fn set_state(&mut self, id: ElementId, state: VisibilityState) {
        if let Some(i) = self.slot(id) {
            self.state[i] = state;
        }
    }

    pub(crate) fn pin(&mut self, id: ElementId) {
        if let Some(i) = self.slot(id) {
            self.pinned[i] = true;
        }
    }

    /// Invokes the element's callback.
    pub(crate) fn fire(
        &mut self,
        id: ElementId,
        cause: RevealCause,
        motion: MotionMode,
    ) -> Result<(), RevealError> {
        let Some(i) = self.slot(id) else {
            return Ok(());
        };
        let (Some(handle), Some(callback)) = (self.handle[i].as_ref(), self.callback[i].as_mut())
        else {
            return Ok(());
        };
        let reveal = Reveal {
            id,
            handle,
            payload: self.options[i].payload,
            cause,
            motion,
        };
        callback(&reveal)
    }

    fn id_at(&self, i: usize) -> ElementId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "slot indices originate from u32 ids"
        )]
        let idx = i as u32;
        ElementId {
            idx,
            generation: self.generation[i],
        }
    }

    fn slot(&self, id: ElementId) -> Option<usize> {
        let i = id.idx as usize;
        (i < self.live.len() && self.live[i] && self.generation[i] == id.generation).then_some(i)
    }
}

impl<H: PartialEq> RevealSession<H> {
    /// Finds the live element whose handle equals `handle`.
    #[must_use]
    pub fn find(&self, handle: &H) -> Option<ElementId> {
        self.handle
            .iter()
            .enumerate()
            .find(|(i, slot)| self.live[*i] && slot.as_ref() == Some(handle))
            .map(|(i, _)| self.id_at(i))
    }
}
