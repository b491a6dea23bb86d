// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for viewport-driven reveal effects.
//!
//! `unveil_core` decides *when* a page element should play its entrance
//! effect: once it scrolls into view, or immediately when the user prefers
//! reduced motion. It is `no_std` compatible (with `alloc`) and knows nothing
//! about the DOM; platform glue lives in backend crates that implement the
//! traits in [`source`], [`motion`] and [`storage`].
//!
//! # Architecture
//!
//! ```text
//!   Backend (IntersectionObserver, matchMedia)
//!       │                          │
//!       ▼                          ▼
//!   &[VisibilityEntry]        MotionMode change
//!       │                          │
//!       ▼                          ▼
//!   ViewportRevealController::handle_batch / set_motion_mode
//!       │
//!       ├──► RevealSession (pending ⇄ revealed, generational ids)
//!       │
//!       └──► on_reveal(&Reveal) ──► presentation side effects
//! ```
//!
//! **[`controller`]**: [`ViewportRevealController`](controller::ViewportRevealController),
//! the reveal state machine. One-shot elements reveal once and are released;
//! toggling elements reset when they leave the viewport.
//!
//! **[`session`]**: Struct-of-arrays store of watched elements addressed by
//! [`ElementId`](element::ElementId) slot handles.
//!
//! **[`options`]**: Per-element options, payloads and the site presets,
//! resolved once from element attributes.
//!
//! **[`source`]** and **[`motion`]**: The traits backends implement.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! **[`app`]**, **[`theme`]**, **[`playback`]**, **[`storage`]**: Page state
//! persisted through an injected key-value port.
//!
//! **[`tween`]**, **[`typewriter`]** and **[`time`]**: Counter, bar and
//! typing schedules on microsecond host time.
//!
//! **[`nav`]** and **[`accordion`]**: Navigation highlight and timeline
//! expansion state.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `serde` (disabled by default): Derives `Serialize`/`Deserialize` for
//!   configuration and trace event types.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod accordion;
pub mod app;
pub mod controller;
pub mod element;
pub mod error;
pub mod motion;
pub mod nav;
pub mod options;
pub mod playback;
pub mod session;
pub mod source;
pub mod storage;
pub mod theme;
pub mod time;
pub mod trace;
pub mod tween;
pub mod typewriter;
