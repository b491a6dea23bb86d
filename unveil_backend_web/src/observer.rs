// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `IntersectionObserver` visibility source.
//!
//! [`IntersectionObserverSource`] creates one native observer per distinct
//! `(threshold, root_margin)` pair and keeps a target table so that native
//! entries can be mapped back to [`ElementId`]s. Translated batches go to a
//! handler installed with [`set_handler`](IntersectionObserverSource::set_handler),
//! normally through [`connect`].
//!
//! When `IntersectionObserver` is unavailable every observed element is
//! reported as entering the viewport on the next microtask, so content is
//! never left hidden.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use unveil_core::controller::ViewportRevealController;
use unveil_core::element::ElementId;
use unveil_core::options::ObserveOptions;
use unveil_core::source::{VisibilityEntry, VisibilitySource};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "queueMicrotask")]
    fn queue_microtask(callback: &JsValue);
}

/// A controller shared between the page and the observer callbacks.
pub type SharedController = Rc<RefCell<ViewportRevealController<IntersectionObserverSource>>>;

type BatchHandler = Box<dyn FnMut(&[VisibilityEntry])>;
type ObserverClosure = Closure<dyn FnMut(Array, JsValue)>;

/// Identity of a native observer: threshold bits plus root margin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ObserverKey {
    threshold_bits: u32,
    root_margin: String,
}

impl ObserverKey {
    pub(crate) fn new(options: &ObserveOptions<'_>) -> Self {
        Self {
            threshold_bits: options.threshold.get().to_bits(),
            root_margin: normalize_margin(options.root_margin),
        }
    }

    fn threshold(&self) -> f32 {
        f32::from_bits(self.threshold_bits)
    }
}

/// Collapses whitespace so `"200px  0px"` and `"200px 0px"` share an observer.
pub(crate) fn normalize_margin(margin: &str) -> String {
    let mut out = String::with_capacity(margin.len());
    for part in margin.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}

struct NativeObserver {
    key: ObserverKey,
    observer: IntersectionObserver,
    // Keeps the JS callback alive for as long as the observer exists.
    _closure: ObserverClosure,
}

struct Target {
    id: ElementId,
    element: Element,
    observer: Option<usize>,
}

/// State shared with the JS callbacks.
struct Router {
    targets: RefCell<Vec<Target>>,
    handler: RefCell<Option<BatchHandler>>,
    fallback: RefCell<Vec<ElementId>>,
    fallback_scheduled: Cell<bool>,
}

impl Router {
    fn id_of(&self, element: &Element) -> Option<ElementId> {
        self.targets
            .borrow()
            .iter()
            .find(|t| &t.element == element)
            .map(|t| t.id)
    }

    fn is_tracked(&self, id: ElementId) -> bool {
        self.targets.borrow().iter().any(|t| t.id == id)
    }

    fn deliver(&self, batch: &[VisibilityEntry]) {
        if batch.is_empty() {
            return;
        }
        // The handler is taken out while it runs, so a reveal callback that
        // unobserves elements can still borrow the target table.
        let handler = self.handler.borrow_mut().take();
        match handler {
            Some(mut handler) => {
                handler(batch);
                let mut slot = self.handler.borrow_mut();
                if slot.is_none() {
                    *slot = Some(handler);
                }
            }
            None => tracing::debug!(entries = batch.len(), "no batch handler installed"),
        }
    }

    fn on_native(&self, entries: &Array) {
        let batch: Vec<VisibilityEntry> = entries
            .iter()
            .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
            .filter_map(|entry| {
                let id = self.id_of(&entry.target())?;
                Some(VisibilityEntry {
                    id,
                    is_intersecting: entry.is_intersecting(),
                })
            })
            .collect();
        tracing::trace!(native = entries.length(), mapped = batch.len(), "intersection batch");
        self.deliver(&batch);
    }

    fn flush_fallback(&self) {
        self.fallback_scheduled.set(false);
        let ids = core::mem::take(&mut *self.fallback.borrow_mut());
        let batch: Vec<VisibilityEntry> = ids
            .into_iter()
            .filter(|&id| self.is_tracked(id))
            .map(VisibilityEntry::entered)
            .collect();
        self.deliver(&batch);
    }
}

/// [`VisibilitySource`] backed by the browser's `IntersectionObserver`.
pub struct IntersectionObserverSource {
    router: Rc<Router>,
    observers: Vec<NativeObserver>,
    supported: bool,
}

impl IntersectionObserverSource {
    /// Creates a source. Native observers are created lazily per option set.
    #[must_use]
    pub fn new() -> Self {
        let supported = js_sys::Reflect::has(&js_sys::global(), &"IntersectionObserver".into())
            .unwrap_or(false);
        if !supported {
            tracing::warn!("IntersectionObserver unavailable; elements reveal immediately");
        }
        Self {
            router: Rc::new(Router {
                targets: RefCell::new(Vec::new()),
                handler: RefCell::new(None),
                fallback: RefCell::new(Vec::new()),
                fallback_scheduled: Cell::new(false),
            }),
            observers: Vec::new(),
            supported,
        }
    }

    /// Installs the function that receives translated batches.
    pub fn set_handler(&self, handler: impl FnMut(&[VisibilityEntry]) + 'static) {
        *self.router.handler.borrow_mut() = Some(Box::new(handler));
    }

    /// Number of native observers created so far.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Number of elements currently observed.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.router.targets.borrow().len()
    }

    fn observer_for(&mut self, options: &ObserveOptions<'_>) -> Option<usize> {
        let key = ObserverKey::new(options);
        if let Some(i) = self.observers.iter().position(|o| o.key == key) {
            return Some(i);
        }

        let router = Rc::clone(&self.router);
        let closure = Closure::wrap(Box::new(move |entries: Array, _observer: JsValue| {
            router.on_native(&entries);
        }) as Box<dyn FnMut(Array, JsValue)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(f64::from(key.threshold())));
        if !key.root_margin.is_empty() {
            init.set_root_margin(&key.root_margin);
        }
        match IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init) {
            Ok(observer) => {
                tracing::debug!(threshold = key.threshold(), margin = %key.root_margin, "created intersection observer");
                self.observers.push(NativeObserver {
                    key,
                    observer,
                    _closure: closure,
                });
                Some(self.observers.len() - 1)
            }
            Err(err) => {
                tracing::warn!(?err, margin = %key.root_margin, "could not create intersection observer");
                None
            }
        }
    }

    fn schedule_fallback(&self, id: ElementId) {
        self.router.fallback.borrow_mut().push(id);
        if self.router.fallback_scheduled.replace(true) {
            return;
        }
        let router = Rc::downgrade(&self.router);
        let task = Closure::once_into_js(move || {
            if let Some(router) = router.upgrade() {
                router.flush_fallback();
            }
        });
        queue_microtask(&task);
    }
}

impl Default for IntersectionObserverSource {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilitySource for IntersectionObserverSource {
    type Handle = Element;

    fn is_valid(&self, handle: &Element) -> bool {
        handle.is_connected()
    }

    fn observe(&mut self, id: ElementId, handle: &Element, options: &ObserveOptions<'_>) {
        let observer = if self.supported {
            self.observer_for(options)
        } else {
            None
        };
        self.router.targets.borrow_mut().push(Target {
            id,
            element: handle.clone(),
            observer,
        });
        match observer {
            Some(i) => self.observers[i].observer.observe(handle),
            None => self.schedule_fallback(id),
        }
    }

    fn unobserve(&mut self, id: ElementId) {
        let removed = {
            let mut targets = self.router.targets.borrow_mut();
            targets
                .iter()
                .position(|t| t.id == id)
                .map(|i| targets.swap_remove(i))
        };
        if let Some(Target {
            element,
            observer: Some(i),
            ..
        }) = removed
            && let Some(native) = self.observers.get(i)
        {
            native.observer.unobserve(&element);
        }
    }
}

impl Drop for IntersectionObserverSource {
    fn drop(&mut self) {
        for native in &self.observers {
            native.observer.disconnect();
        }
        self.router.targets.borrow_mut().clear();
        self.router.handler.borrow_mut().take();
    }
}

impl core::fmt::Debug for IntersectionObserverSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IntersectionObserverSource")
            .field("observers", &self.observers.len())
            .field("targets", &self.router.targets.borrow().len())
            .field("supported", &self.supported)
            .finish_non_exhaustive()
    }
}

/// Routes the source's batches into `controller`.
///
/// The handler holds a weak reference, so dropping the last strong handle
/// to the controller tears everything down.
pub fn connect(controller: &SharedController) {
    let weak: Weak<RefCell<_>> = Rc::downgrade(controller);
    controller.borrow().source().set_handler(move |batch| {
        let Some(controller) = weak.upgrade() else {
            return;
        };
        match controller.try_borrow_mut() {
            Ok(mut controller) => {
                controller.handle_batch(batch);
            }
            Err(_) => tracing::warn!(entries = batch.len(), "controller busy; batch dropped"),
        }
    });
}
