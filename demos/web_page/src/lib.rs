// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: a portfolio page wired to `unveil_backend_web`.
//!
//! Registers the page's sections, skill rows, stat counters and lazy images
//! with one shared controller that follows `prefers-reduced-motion`. A second
//! controller drives the navigation highlight; it never follows the motion
//! preference, so reduced motion cannot pin every section at once. The theme
//! follows `prefers-color-scheme` until the user picks one, the hero text is
//! typed out, the timeline cards expand one at a time, and `t`/`h`/`s`/`g`
//! are handled as shortcuts. The music widget is not wired here.
//!
//! Build with: `wasm-pack build --target web demos/web_page`

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent};

use unveil_backend_web::{
    IntersectionObserverSource, LIGHT_SCHEME_QUERY, LocalStorage, MediaQueryMotion,
    MediaQueryWatch, SharedController, connect, now, register_with_preset,
};
use unveil_core::accordion::{Accordion, AccordionChange, detail_heading};
use unveil_core::app::{AppState, KeyPress, Shortcut};
use unveil_core::controller::ViewportRevealController;
use unveil_core::element::ElementId;
use unveil_core::error::RevealError;
use unveil_core::motion::{MotionMode, MotionPreference as _};
use unveil_core::nav::NavSpy;
use unveil_core::options::{RevealPayload, RevealPreset};
use unveil_core::session::{Reveal, RevealCause};
use unveil_core::theme::Theme;
use unveil_core::time::{Duration, HostTime};
use unveil_core::tween::{BAR_DURATION, COUNTER_DURATION, LABEL_DURATION, Tween, format_compact};
use unveil_core::typewriter::Typewriter;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;
}

/// Extra delay per `data-delay` step on staggered sections.
const STAGGER_STEP_MS: u32 = 80;

type Page = Rc<RefCell<AppState<LocalStorage>>>;
type FrameStep = Box<dyn FnMut(Duration) -> bool>;

/// Entry point, called automatically by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let mut motion = MediaQueryMotion::new();
    let reveals: SharedController = Rc::new(RefCell::new(ViewportRevealController::with_motion(
        IntersectionObserverSource::new(),
        motion.mode(),
    )));
    connect(&reveals);
    motion.follow(&reveals);

    let mut scheme = MediaQueryWatch::new(LIGHT_SCHEME_QUERY);
    let (app, _) = AppState::load(LocalStorage::open(), scheme.matches(), motion.mode());
    apply_theme(&document, app.theme().theme());
    let page: Page = Rc::new(RefCell::new(app));
    {
        let page = Rc::clone(&page);
        let document = document.clone();
        scheme.on_change(move |prefers_light| {
            let mut page = page.borrow_mut();
            if page.on_system_theme_change(prefers_light) {
                apply_theme(&document, page.theme().theme());
            }
        });
    }

    register_reveals(&reveals, &document)?;
    let spy = wire_nav_spy(&document)?;
    wire_timeline(&document)?;
    wire_shortcuts(&document, &page)?;
    type_hero(&document, motion.mode());

    // Everything below lives as long as the page.
    core::mem::forget(reveals);
    core::mem::forget(spy);
    core::mem::forget(motion);
    core::mem::forget(scheme);
    Ok(())
}

fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn dom_error(id: ElementId, err: &JsValue) -> RevealError {
    RevealError::callback(id, format!("{err:?}"))
}

/// Calls `step` with the time since `start` on every frame until it returns
/// `false`.
fn animate(start: HostTime, mut step: FrameStep) {
    let frame = Closure::once_into_js(move |_timestamp: f64| {
        if step(now().saturating_duration_since(start)) {
            animate(start, step);
        }
    });
    request_animation_frame(&frame);
}

fn register_reveals(reveals: &SharedController, document: &Document) -> Result<(), JsValue> {
    for section in query_all(document, "[data-reveal]")? {
        register_with_preset(reveals, section, &RevealPreset::SECTION, |r| {
            let el = r.handle;
            if let RevealPayload::Stagger(steps) = r.payload
                && steps > 0
                && !r.motion.is_reduced()
                && let Some(html) = el.dyn_ref::<HtmlElement>()
            {
                let delay = format!("{}ms", steps.saturating_mul(STAGGER_STEP_MS));
                html.style()
                    .set_property("transition-delay", &delay)
                    .map_err(|err| dom_error(r.id, &err))?;
            }
            el.class_list()
                .add_1("is-visible")
                .map_err(|err| dom_error(r.id, &err))
        });
    }

    for row in query_all(document, ".skill")? {
        register_with_preset(reveals, row, &RevealPreset::SKILL, |r| {
            let RevealPayload::Level(level) = r.payload else {
                return Ok(());
            };
            fill_bar(r, level)?;
            if let Ok(Some(label)) = r.handle.query_selector("code") {
                let tween = Tween::new(0.0, f64::from(level), LABEL_DURATION).for_motion(r.motion);
                animate(
                    now(),
                    Box::new(move |elapsed| {
                        label.set_text_content(Some(&format!("{}%", tween.rounded_at(elapsed))));
                        !tween.is_finished(elapsed)
                    }),
                );
            }
            Ok(())
        });
    }

    for stat in query_all(document, "[data-count]")? {
        register_with_preset(reveals, stat, &RevealPreset::COUNTER, |r| {
            let RevealPayload::Count(target) = r.payload else {
                return Ok(());
            };
            let tween = Tween::new(0.0, target as f64, COUNTER_DURATION).for_motion(r.motion);
            let el = r.handle.clone();
            animate(
                now(),
                Box::new(move |elapsed| {
                    el.set_text_content(Some(&format_compact(tween.rounded_at(elapsed))));
                    !tween.is_finished(elapsed)
                }),
            );
            Ok(())
        });
    }

    for image in query_all(document, "img[data-src]")? {
        register_with_preset(reveals, image, &RevealPreset::LAZY_IMAGE, |r| {
            let el = r.handle;
            if let Some(src) = el.get_attribute("data-src") {
                el.set_attribute("src", &src)
                    .map_err(|err| dom_error(r.id, &err))?;
                el.remove_attribute("data-src")
                    .map_err(|err| dom_error(r.id, &err))?;
            }
            Ok(())
        });
    }
    Ok(())
}

fn fill_bar(r: &Reveal<'_, Element>, level: u8) -> Result<(), RevealError> {
    let Ok(Some(bar)) = r.handle.query_selector(".bar") else {
        return Ok(());
    };
    let Some(bar) = bar.dyn_ref::<HtmlElement>() else {
        return Ok(());
    };
    let style = bar.style();
    let transition = if r.motion.is_reduced() {
        String::from("none")
    } else {
        format!("width {}ms ease-out", BAR_DURATION.as_millis_f64())
    };
    style
        .set_property("transition", &transition)
        .and_then(|()| style.set_property("width", &format!("{level}%")))
        .map_err(|err| dom_error(r.id, &err))
}

fn wire_nav_spy(document: &Document) -> Result<SharedController, JsValue> {
    let links = query_all(document, "nav a[href^=\"#\"]")?;
    let nav = Rc::new(RefCell::new(NavSpy::new(
        links.iter().filter_map(|link| link.get_attribute("href")),
    )));
    let spy: SharedController = Rc::new(RefCell::new(ViewportRevealController::new(
        IntersectionObserverSource::new(),
    )));
    connect(&spy);

    let links = Rc::new(links);
    for section in query_all(document, "section[id]")? {
        let nav = Rc::clone(&nav);
        let links = Rc::clone(&links);
        register_with_preset(&spy, section, &RevealPreset::NAV_SPY, move |r| {
            if r.cause != RevealCause::Intersection {
                return Ok(());
            }
            let mut nav = nav.borrow_mut();
            if !nav.on_section_entered(&r.handle.id()) {
                return Ok(());
            }
            for (i, link) in links.iter().enumerate() {
                let result = match nav.aria_current(i) {
                    Some(value) => link.set_attribute("aria-current", value),
                    None => link.remove_attribute("aria-current"),
                };
                result.map_err(|err| dom_error(r.id, &err))?;
            }
            Ok(())
        });
    }
    Ok(spy)
}

fn wire_timeline(document: &Document) -> Result<(), JsValue> {
    let Some(timeline) = document.get_element_by_id("timeline") else {
        return Ok(());
    };
    let cards = query_all(document, "#timeline .card")?;
    let detail = document.get_element_by_id("timeline-details");
    let mut accordion = Accordion::new(cards.len());

    let on_click = Closure::wrap(Box::new(move |event: Event| {
        let card = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|t| t.closest(".card").ok().flatten());
        let Some(index) = card.and_then(|card| cards.iter().position(|c| *c == card)) else {
            return;
        };
        let change = accordion.toggle(index);
        for (i, card) in cards.iter().enumerate() {
            if let Err(err) = card.set_attribute("aria-expanded", accordion.aria_expanded(i)) {
                tracing::warn!(?err, "could not update timeline card");
            }
        }
        if let (AccordionChange::Expanded(i), Some(detail)) = (change, &detail) {
            let card = &cards[i];
            let year = card.get_attribute("data-year").unwrap_or_default();
            let title = text_of(card, "h3");
            let body = card
                .query_selector(".details")
                .ok()
                .flatten()
                .map(|d| d.inner_html())
                .unwrap_or_default();
            detail.set_inner_html(&format!("<h3>{}</h3>{body}", detail_heading(&year, &title)));
        }
    }) as Box<dyn FnMut(Event)>);
    timeline.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

fn text_of(root: &Element, selector: &str) -> String {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.text_content())
        .unwrap_or_default()
}

fn wire_shortcuts(document: &Document, page: &Page) -> Result<(), JsValue> {
    let page = Rc::clone(page);
    let doc = document.clone();
    let on_key = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        let key = event.key();
        let press = KeyPress {
            key: &key,
            modified: event.meta_key() || event.ctrl_key() || event.alt_key(),
            in_editable: is_editable(event.target()),
        };
        let Some(shortcut) = Shortcut::from_key(press) else {
            return;
        };
        event.prevent_default();
        if let Some(anchor) = shortcut.anchor() {
            if let Ok(Some(target)) = doc.query_selector(anchor) {
                target.scroll_into_view();
            }
            return;
        }
        if shortcut == Shortcut::ToggleMusic {
            tracing::debug!("music shortcut ignored; no player on this page");
            return;
        }
        let mut page = page.borrow_mut();
        page.apply(shortcut, true);
        apply_theme(&doc, page.theme().theme());
    }) as Box<dyn FnMut(KeyboardEvent)>);
    document.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
    on_key.forget();
    Ok(())
}

fn is_editable(target: Option<web_sys::EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_into::<HtmlElement>().ok())
        .is_some_and(|el| {
            el.is_content_editable()
                || matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
        })
}

fn apply_theme(document: &Document, theme: Theme) {
    let result = document
        .document_element()
        .map_or(Ok(()), |root| root.set_attribute("data-theme", theme.as_str()));
    if let Err(err) = result {
        tracing::warn!(?err, "could not set data-theme");
    }
    if let Ok(Some(meta)) = document.query_selector("meta[name=\"theme-color\"]")
        && let Err(err) = meta.set_attribute("content", theme.meta_color())
    {
        tracing::warn!(?err, "could not set theme-color");
    }
    if let Ok(Some(button)) = document.query_selector("[data-theme-toggle]") {
        button.set_text_content(Some(theme.icon()));
        let pressed = if theme.aria_pressed() { "true" } else { "false" };
        if let Err(err) = button.set_attribute("aria-pressed", pressed) {
            tracing::warn!(?err, "could not update theme toggle");
        }
    }
}

fn type_hero(document: &Document, motion: MotionMode) {
    let (Ok(Some(heading)), Ok(Some(paragraph))) = (
        document.query_selector("#home h1"),
        document.query_selector("#home p"),
    ) else {
        return;
    };
    let heading_text = heading.text_content().unwrap_or_default();
    let paragraph_text = paragraph.text_content().unwrap_or_default();
    let Some(typer) = Typewriter::new(&heading_text, &paragraph_text, motion) else {
        return;
    };
    animate(
        now(),
        Box::new(move |elapsed| {
            let frame = typer.frame(elapsed);
            heading.set_text_content(Some(frame.heading.apply(&heading_text)));
            paragraph.set_text_content(Some(frame.paragraph.apply(&paragraph_text)));
            !typer.is_finished(elapsed)
        }),
    );
}
