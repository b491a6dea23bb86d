// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility-source contract for platform integrations.
//!
//! Unveil splits platform work into *backend* crates. Each backend provides:
//!
//! - **Visibility source**: Implements [`VisibilitySource`] to start and
//!   stop monitoring elements (e.g. `IntersectionObserver`).
//!
//! - **Batch delivery**: Whatever owns the platform callback turns native
//!   entries into [`VisibilityEntry`] values and hands the whole batch to
//!   [`ViewportRevealController::handle_batch`]. Delivery is push-based and
//!   not part of the trait.
//!
//! - **Motion preference**: Implements
//!   [`MotionPreference`](crate::motion::MotionPreference) and pushes changes
//!   into [`ViewportRevealController::set_motion_mode`].
//!
//! # Crate boundaries
//!
//! `unveil_core` owns the session, the controller, and this contract module.
//! Backend crates depend on `unveil_core` and provide platform glue.
//! Application code depends on both and wires them together.
//!
//! [`ViewportRevealController::handle_batch`]: crate::controller::ViewportRevealController::handle_batch
//! [`ViewportRevealController::set_motion_mode`]: crate::controller::ViewportRevealController::set_motion_mode

use crate::element::ElementId;
use crate::options::ObserveOptions;

/// One element's visibility change inside a notification batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibilityEntry {
    /// The element the entry refers to.
    pub id: ElementId,
    /// Whether the element's intersection ratio is now at or above its
    /// threshold.
    pub is_intersecting: bool,
}

impl VisibilityEntry {
    /// Entry reporting that `id` entered the viewport.
    #[inline]
    #[must_use]
    pub const fn entered(id: ElementId) -> Self {
        Self {
            id,
            is_intersecting: true,
        }
    }

    /// Entry reporting that `id` left the viewport.
    #[inline]
    #[must_use]
    pub const fn left(id: ElementId) -> Self {
        Self {
            id,
            is_intersecting: false,
        }
    }
}

/// Starts and stops visibility monitoring for platform elements.
///
/// Both the `IntersectionObserver` backend and test doubles implement this
/// trait, so the controller never depends on a real rendering surface.
///
/// # Wiring pseudocode
///
/// ```rust,ignore
/// let controller = Rc::new(RefCell::new(ViewportRevealController::new(source)));
///
/// // Platform callback: translate native entries, then hand them over.
/// fn on_intersections(native: &[NativeEntry]) {
///     let batch: Vec<VisibilityEntry> = native.iter().filter_map(translate).collect();
///     controller.borrow_mut().handle_batch(&batch);
/// }
///
/// // Preference listener.
/// fn on_motion_change(reduced: bool) {
///     controller
///         .borrow_mut()
///         .set_motion_mode(MotionMode::from_prefers_reduced(reduced));
/// }
/// ```
pub trait VisibilitySource {
    /// Platform element handle (a DOM `Element`, a test token, ...).
    ///
    /// Equality is element identity: registering an equal handle again
    /// re-arms the existing entry instead of adding a second one.
    type Handle: PartialEq;

    /// Returns whether `handle` refers to something that can be observed.
    ///
    /// Invalid handles are rejected by
    /// [`register`](crate::controller::ViewportRevealController::register)
    /// without touching the session.
    fn is_valid(&self, handle: &Self::Handle) -> bool {
        let _ = handle;
        true
    }

    /// Begins delivering entries for `handle` under the id `id`.
    fn observe(&mut self, id: ElementId, handle: &Self::Handle, options: &ObserveOptions<'_>);

    /// Stops delivering entries for `id`. Unknown ids are ignored.
    fn unobserve(&mut self, id: ElementId);
}
