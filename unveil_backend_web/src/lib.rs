// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for unveil.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`IntersectionObserverSource`]: `IntersectionObserver` visibility source
//! - [`MediaQueryMotion`] / [`MediaQueryWatch`]: `matchMedia` preferences
//! - [`LocalStorage`]: `localStorage` storage port
//! - [`DomAttributes`]: attribute overrides read from markup
//!
//! # Wiring
//!
//! ```rust,ignore
//! let mut motion = MediaQueryMotion::new();
//! let controller: SharedController = Rc::new(RefCell::new(
//!     ViewportRevealController::with_motion(IntersectionObserverSource::new(), motion.mode()),
//! ));
//! connect(&controller);
//! motion.follow(&controller);
//! register_with_preset(&controller, skill_row, &RevealPreset::SKILL, |r| { /* ... */ Ok(()) });
//! ```

#![no_std]

extern crate alloc;

mod attrs;
mod media;
mod observer;
mod storage;

pub use attrs::DomAttributes;
pub use media::{LIGHT_SCHEME_QUERY, MediaQueryMotion, MediaQueryWatch, REDUCED_MOTION_QUERY};
pub use observer::{IntersectionObserverSource, SharedController, connect};
pub use storage::LocalStorage;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use unveil_core::element::ElementId;
use unveil_core::error::RevealError;
use unveil_core::options::RevealPreset;
use unveil_core::session::Reveal;
use unveil_core::time::HostTime;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    fn performance_now() -> f64;
}

/// Returns the current host time from `performance.now()`, in microsecond
/// ticks.
#[must_use]
pub fn now() -> HostTime {
    HostTime::from_millis_f64(performance_now())
}

/// Resolves `preset` against the element's attributes and registers it.
///
/// Returns `None` if the element was rejected or the controller is busy
/// (called from inside one of its own callbacks).
pub fn register_with_preset<F>(
    controller: &SharedController,
    element: Element,
    preset: &RevealPreset,
    on_reveal: F,
) -> Option<ElementId>
where
    F: FnMut(&Reveal<'_, Element>) -> Result<(), RevealError> + 'static,
{
    let options = preset.resolve(&DomAttributes(&element));
    let Ok(mut controller) = controller.try_borrow_mut() else {
        tracing::warn!("controller busy; registration skipped");
        return None;
    };
    controller.register(element, options, on_reveal)
}
