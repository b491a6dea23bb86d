// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `matchMedia` preference listeners.

use alloc::boxed::Box;
use alloc::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{MediaQueryList, MediaQueryListEvent};

use unveil_core::motion::{MotionMode, MotionPreference};

use crate::observer::SharedController;

/// Media query for the reduced-motion preference.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Media query for the light color-scheme preference.
pub const LIGHT_SCHEME_QUERY: &str = "(prefers-color-scheme: light)";

type ChangeClosure = Closure<dyn FnMut(MediaQueryListEvent)>;

/// A `MediaQueryList` with an optional `change` listener.
///
/// The listener is removed when this value is dropped.
pub struct MediaQueryWatch {
    list: Option<MediaQueryList>,
    listener: Option<ChangeClosure>,
}

impl MediaQueryWatch {
    /// Evaluates `query`. A missing window or a rejected query behaves as a
    /// query that never matches.
    #[must_use]
    pub fn new(query: &str) -> Self {
        let list = web_sys::window().and_then(|w| match w.match_media(query) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(query, ?err, "matchMedia failed");
                None
            }
        });
        Self {
            list,
            listener: None,
        }
    }

    /// Returns whether the query currently matches.
    #[must_use]
    pub fn matches(&self) -> bool {
        self.list.as_ref().is_some_and(MediaQueryList::matches)
    }

    /// Calls `on_change` with the new match state on every `change` event.
    ///
    /// Replaces any previous listener.
    pub fn on_change(&mut self, mut on_change: impl FnMut(bool) + 'static) {
        self.detach();
        let Some(list) = &self.list else {
            return;
        };
        let closure = Closure::wrap(Box::new(move |event: MediaQueryListEvent| {
            on_change(event.matches());
        }) as Box<dyn FnMut(MediaQueryListEvent)>);
        let added =
            list.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        if listener_ok(added, "add") {
            self.listener = Some(closure);
        }
    }

    fn detach(&mut self) {
        if let (Some(list), Some(closure)) = (&self.list, self.listener.take()) {
            let removed =
                list.remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            listener_ok(removed, "remove");
        }
    }
}

/// Logs a failed listener call. Returns whether the call succeeded.
fn listener_ok<E: core::fmt::Debug>(result: Result<(), E>, action: &'static str) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(?err, action, "media query listener call failed");
            false
        }
    }
}

impl Drop for MediaQueryWatch {
    fn drop(&mut self) {
        self.detach();
    }
}

impl core::fmt::Debug for MediaQueryWatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MediaQueryWatch")
            .field("matches", &self.matches())
            .field("listening", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

/// The platform's `prefers-reduced-motion` preference.
#[derive(Debug)]
pub struct MediaQueryMotion {
    watch: MediaQueryWatch,
}

impl MediaQueryMotion {
    /// Evaluates [`REDUCED_MOTION_QUERY`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            watch: MediaQueryWatch::new(REDUCED_MOTION_QUERY),
        }
    }

    /// Pushes every preference change into `controller`.
    pub fn follow(&mut self, controller: &SharedController) {
        let weak = Rc::downgrade(controller);
        self.on_change(move |mode| {
            if let Some(controller) = weak.upgrade() {
                set_mode(&controller, mode);
            }
        });
    }

    /// Calls `on_change` with the new mode on every change.
    pub fn on_change(&mut self, mut on_change: impl FnMut(MotionMode) + 'static) {
        self.watch.on_change(move |reduced| {
            on_change(MotionMode::from_prefers_reduced(reduced));
        });
    }
}

impl Default for MediaQueryMotion {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionPreference for MediaQueryMotion {
    fn prefers_reduced(&self) -> bool {
        self.watch.matches()
    }
}

fn set_mode(controller: &SharedController, mode: MotionMode) {
    match controller.try_borrow_mut() {
        Ok(mut controller) => controller.set_motion_mode(mode),
        Err(_) => tracing::warn!(?mode, "controller busy; motion change dropped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_failures_are_reported() {
        assert!(listener_ok(Ok::<(), &str>(()), "add"));
        assert!(!listener_ok(Err("InvalidStateError"), "remove"));
    }
}
