// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end reveal scenarios against the fake visibility source.

use std::cell::RefCell;
use std::rc::Rc;

use unveil_core::controller::ViewportRevealController;
use unveil_core::element::VisibilityState;
use unveil_core::motion::{MotionMode, MotionPreference};
use unveil_core::nav::NavSpy;
use unveil_core::options::{
    AttributeSource, RevealOptions, RevealPayload, RevealPreset, Threshold,
};
use unveil_core::session::{Reveal, RevealCause};
use unveil_core::time::Duration;
use unveil_core::tween::{BAR_DURATION, LABEL_DURATION, Tween};
use unveil_debug::recorder::{RecordedEvent, RecorderSink};
use unveil_harness::{
    DETACHED, FakeMotionPreference, FakeVisibilitySource, Invocation, RevealProbe,
};

type Controller = ViewportRevealController<FakeVisibilitySource>;

fn controller() -> Controller {
    ViewportRevealController::new(FakeVisibilitySource::new())
}

fn one_shot() -> RevealOptions {
    RevealOptions::default()
}

fn toggling() -> RevealOptions {
    RevealOptions::default().with_one_shot(false)
}

/// Delivers one batch described by handle names.
fn deliver(c: &mut Controller, entries: &[(&'static str, bool)]) {
    let batch = c.source().batch(entries);
    c.handle_batch(&batch);
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_one_shot_reveals_once() {
    let probe = RevealProbe::new();
    let mut c = controller();
    let id = c
        .register(
            "e",
            one_shot().with_threshold(Threshold::from_const(0.5)),
            probe.callback(),
        )
        .unwrap();
    assert_eq!(c.source().observing()[0].threshold, 0.5);

    let batch = [unveil_core::source::VisibilityEntry::entered(id)];
    c.handle_batch(&batch);
    assert_eq!(probe.count("e"), 1);
    assert!(!c.is_registered(id));
    assert!(!c.source().is_observing(id));

    let summary = c.handle_batch(&batch);
    assert_eq!(probe.count("e"), 1);
    assert_eq!(summary.skipped, 1);
}

#[test]
fn scenario_b_reduced_motion_reveals_all_pending_in_order() {
    let probe = RevealProbe::new();
    let mut c = controller();
    let e1 = c.register("e1", one_shot(), probe.callback()).unwrap();
    let e2 = c.register("e2", one_shot(), probe.callback()).unwrap();

    c.set_motion_mode(MotionMode::Reduced);

    assert_eq!(probe.handles(), ["e1", "e2"]);
    assert!(
        probe
            .invocations()
            .iter()
            .all(|i| i.cause == RevealCause::ReducedMotion)
    );
    assert!(!c.is_registered(e1));
    assert!(!c.is_registered(e2));
    assert!(c.is_empty());
}

#[test]
fn scenario_c_toggling_fires_on_entry_edges_only() {
    let probe = RevealProbe::new();
    let mut c = controller();
    let id = c.register("e", toggling(), probe.callback()).unwrap();

    deliver(&mut c, &[("e", true)]);
    deliver(&mut c, &[("e", false)]);
    assert_eq!(c.state(id), Some(VisibilityState::Pending));
    deliver(&mut c, &[("e", true)]);

    assert_eq!(probe.count("e"), 2);
    assert_eq!(c.state(id), Some(VisibilityState::Revealed));
    assert!(c.source().is_observing(id), "toggling stays observed");
}

#[test]
fn scenario_d_invalid_element_is_skipped() {
    let probe = RevealProbe::new();
    let mut c = controller();
    assert_eq!(c.register(DETACHED, one_shot(), probe.callback()), None);
    assert_eq!(c.register(None, one_shot(), probe.callback()), None);
    assert!(c.is_empty());
    assert_eq!(c.source().observe_calls(), 0);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn p1_one_shot_fires_at_most_once_under_noise() {
    let probe = RevealProbe::new();
    let mut c = controller();
    let id = c.register("e", one_shot(), probe.callback()).unwrap();
    let noise = [
        unveil_core::source::VisibilityEntry::left(id),
        unveil_core::source::VisibilityEntry::entered(id),
        unveil_core::source::VisibilityEntry::entered(id),
        unveil_core::source::VisibilityEntry::left(id),
        unveil_core::source::VisibilityEntry::entered(id),
    ];
    for _ in 0..4 {
        c.handle_batch(&noise);
    }
    c.set_motion_mode(MotionMode::Reduced);
    c.set_motion_mode(MotionMode::Full);
    c.handle_batch(&noise);
    assert_eq!(probe.count("e"), 1);
}

#[test]
fn p2_reduced_motion_is_synchronous_and_complete() {
    let probe = RevealProbe::new();
    let mut c = controller();
    let names = ["a", "b", "c", "d"];
    let ids: Vec<_> = names
        .iter()
        .map(|&n| c.register(n, toggling(), probe.callback()).unwrap())
        .collect();
    // "b" is already revealed and must not fire again.
    deliver(&mut c, &[("b", true)]);

    c.set_motion_mode(MotionMode::Reduced);

    assert_eq!(probe.handles(), ["b", "a", "c", "d"]);
    for id in ids {
        assert_eq!(c.state(id), Some(VisibilityState::Revealed));
    }
}

#[test]
fn p3_unregister_is_idempotent() {
    let probe = RevealProbe::new();
    let mut c = controller();
    let id = c.register("e", toggling(), probe.callback()).unwrap();
    assert!(c.unregister(id));
    assert!(!c.unregister(id));

    let stranger = {
        let mut other = controller();
        other.register("x", one_shot(), probe.callback()).unwrap()
    };
    // An id from another controller with no live slot here is ignored.
    assert!(!c.unregister(stranger));

    c.handle_batch(&[unveil_core::source::VisibilityEntry::entered(id)]);
    assert_eq!(probe.total(), 0);
    assert_eq!(c.source().unobserved(), &[id]);
}

#[test]
fn p4_leaving_never_fires() {
    let probe = RevealProbe::new();
    let mut c = controller();
    c.register("e", toggling(), probe.callback()).unwrap();
    deliver(&mut c, &[("e", true)]);
    for _ in 0..3 {
        deliver(&mut c, &[("e", false)]);
    }
    assert_eq!(probe.count("e"), 1);
}

#[test]
fn p5_failing_callback_does_not_stop_batch() {
    let probe = RevealProbe::new();
    let mut c = controller();
    c.register("a", one_shot(), probe.callback()).unwrap();
    let bad = c.register("bad", one_shot(), probe.failing("boom")).unwrap();
    c.register("c", one_shot(), probe.callback()).unwrap();

    let batch = c.source().batch(&[("a", true), ("bad", true), ("c", true)]);
    let summary = c.handle_batch(&batch);

    assert_eq!(probe.handles(), ["a", "bad", "c"]);
    assert_eq!(summary.revealed, 3);
    assert_eq!(summary.failed, 1);
    assert!(!c.is_registered(bad), "failed one-shot is still released");
}

// ---------------------------------------------------------------------------
// Motion and lifecycle
// ---------------------------------------------------------------------------

#[test]
fn reduced_reveals_are_pinned_after_returning_to_full() {
    let probe = RevealProbe::new();
    let mut c = controller();
    let id = c.register("nav", toggling(), probe.callback()).unwrap();
    c.set_motion_mode(MotionMode::Reduced);
    c.set_motion_mode(MotionMode::Full);

    deliver(&mut c, &[("nav", false)]);
    assert_eq!(c.state(id), Some(VisibilityState::Revealed));
    assert_eq!(probe.count("nav"), 1);
}

#[test]
fn registered_while_reduced_reveals_on_first_report() {
    let pref = FakeMotionPreference::new(true);
    let probe = RevealProbe::new();
    let mut c = ViewportRevealController::with_motion(FakeVisibilitySource::new(), pref.mode());
    c.register("late", one_shot(), probe.callback()).unwrap();
    assert_eq!(probe.total(), 0, "never fires inside register");

    deliver(&mut c, &[("late", false)]);
    assert_eq!(
        probe.invocations(),
        [Invocation {
            handle: "late",
            cause: RevealCause::ReducedMotion,
            payload: RevealPayload::None,
        }]
    );
}

#[test]
fn motion_preference_drives_mode_changes() {
    let pref = FakeMotionPreference::new(false);
    let probe = RevealProbe::new();
    let mut c = ViewportRevealController::with_motion(FakeVisibilitySource::new(), pref.mode());
    c.register("e", one_shot(), probe.callback()).unwrap();

    pref.set(true);
    c.set_motion_mode(pref.mode());
    assert_eq!(probe.count("e"), 1);
    c.set_motion_mode(pref.mode());
    assert_eq!(probe.count("e"), 1);
}

#[test]
fn rearming_replaces_callback_and_keeps_id() {
    let first = RevealProbe::new();
    let second = RevealProbe::new();
    let mut c = controller();
    let id = c.register("e", toggling(), first.callback()).unwrap();
    deliver(&mut c, &[("e", true)]);

    let again = c.register("e", one_shot(), second.callback()).unwrap();
    assert_eq!(again, id);
    assert_eq!(c.state(id), Some(VisibilityState::Pending));
    assert_eq!(c.len(), 1);
    assert_eq!(c.source().observing().len(), 1);

    deliver(&mut c, &[("e", true)]);
    assert_eq!(first.total(), 1);
    assert_eq!(second.total(), 1);
    assert!(!c.is_registered(id));
}

#[test]
fn dispose_releases_and_controller_is_reusable() {
    let probe = RevealProbe::new();
    let mut c = controller();
    let a = c.register("a", one_shot(), probe.callback()).unwrap();
    let b = c.register("b", toggling(), probe.callback()).unwrap();

    c.dispose();
    assert!(c.is_empty());
    assert!(c.source().observing().is_empty());
    assert_eq!(c.source().unobserved(), &[a, b]);

    let fresh = c.register("a", one_shot(), probe.callback()).unwrap();
    assert_ne!(fresh, a, "old ids stay stale");
    c.handle_batch(&[
        unveil_core::source::VisibilityEntry::entered(a),
        unveil_core::source::VisibilityEntry::entered(fresh),
    ]);
    assert_eq!(probe.handles(), ["a"]);
    assert!(!c.is_registered(a));
}

#[test]
fn unregister_mid_stream_cancels_later_entries() {
    let probe = RevealProbe::new();
    let mut c = controller();
    let id = c.register("e", one_shot(), probe.callback()).unwrap();
    let batch = c.source().batch(&[("e", true)]);
    c.unregister(id);
    c.handle_batch(&batch);
    assert_eq!(probe.total(), 0);
}

// ---------------------------------------------------------------------------
// Presets and tracing
// ---------------------------------------------------------------------------

struct Markup(&'static [(&'static str, &'static str)], Option<&'static str>);

impl AttributeSource for Markup {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| (*v).to_owned())
    }

    fn label_text(&self) -> Option<String> {
        self.1.map(str::to_owned)
    }
}

#[test]
fn presets_resolve_payloads_for_callbacks() {
    let probe = RevealProbe::new();
    let mut c = controller();
    let skill = RevealPreset::SKILL.resolve(&Markup(&[("data-level", "0")], Some("85%")));
    let counter = RevealPreset::COUNTER.resolve(&Markup(&[("data-count", "1790")], None));
    c.register("skill", skill, probe.callback()).unwrap();
    c.register("counter", counter, probe.callback()).unwrap();

    let obs = c.source().observing();
    assert_eq!(obs[0].threshold, 0.35);
    assert_eq!(obs[1].threshold, 0.55);

    deliver(&mut c, &[("counter", true), ("skill", true)]);
    let payloads: Vec<_> = probe.invocations().iter().map(|i| i.payload).collect();
    assert_eq!(
        payloads,
        [RevealPayload::Count(1790), RevealPayload::Level(85)]
    );
}

#[test]
fn sections_carry_stagger_and_images_preload() {
    let probe = RevealProbe::new();
    let mut c = controller();
    let first = RevealPreset::SECTION.resolve(&Markup(&[], None));
    let third = RevealPreset::SECTION.resolve(&Markup(&[("data-delay", "2")], None));
    let image = RevealPreset::LAZY_IMAGE.resolve(&Markup(&[], None));
    c.register("about", first, probe.callback()).unwrap();
    c.register("projects", third, probe.callback()).unwrap();
    c.register("cover", image, probe.callback()).unwrap();

    let obs = c.source().observing();
    assert_eq!(obs[0].root_margin, "-12% 0px");
    assert_eq!(obs[0].threshold, 0.08);
    assert_eq!(obs[2].root_margin, "200px 0px");
    assert_eq!(obs[2].threshold, 0.01);

    deliver(&mut c, &[("projects", true), ("about", true), ("cover", true)]);
    let payloads: Vec<_> = probe
        .invocations()
        .iter()
        .map(|i| (i.handle, i.payload))
        .collect();
    assert_eq!(
        payloads,
        [
            ("projects", RevealPayload::Stagger(2)),
            ("about", RevealPayload::Stagger(0)),
            ("cover", RevealPayload::None),
        ]
    );
    assert!(c.is_empty(), "all three are one-shot");
}

#[test]
fn skill_reveal_drives_label_and_bar() {
    let revealed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&revealed);
    let mut c = controller();
    let skill = RevealPreset::SKILL.resolve(&Markup(&[("data-level", "80")], None));
    c.register("rust", skill, move |r: &Reveal<'_, &'static str>| {
        if let RevealPayload::Level(level) = r.payload {
            sink.borrow_mut().push((level, r.motion));
        }
        Ok(())
    })
    .unwrap();
    deliver(&mut c, &[("rust", true)]);

    let (level, motion) = revealed.borrow()[0];
    let label = Tween::new(0.0, f64::from(level), LABEL_DURATION).for_motion(motion);
    let bar = Tween::new(0.0, f64::from(level), BAR_DURATION).for_motion(motion);
    let label_done = LABEL_DURATION;
    assert_eq!(label.rounded_at(label_done), 80);
    assert!(!bar.is_finished(label_done), "the bar outlasts the label");
    assert_eq!(bar.rounded_at(Duration::from_millis(450)), 40);
    assert!(bar.is_finished(BAR_DURATION));
}

#[test]
fn nav_spy_preset_toggles_with_margin() {
    let probe = RevealProbe::new();
    let mut c = controller();
    let options = RevealPreset::NAV_SPY.resolve(&Markup(&[], None));
    assert!(!options.one_shot);
    c.register("about", options, probe.callback()).unwrap();
    assert_eq!(c.source().observing()[0].root_margin, "-45% 0px -50% 0px");

    deliver(&mut c, &[("about", true)]);
    deliver(&mut c, &[("about", false)]);
    deliver(&mut c, &[("about", true)]);
    assert_eq!(probe.count("about"), 2);
}

#[test]
fn nav_spy_highlights_last_entered_section() {
    let nav = Rc::new(RefCell::new(NavSpy::new(["#home", "#skills", "#gaming"])));
    let mut c = controller();
    for section in ["home", "skills", "gaming"] {
        let nav = Rc::clone(&nav);
        let options = RevealPreset::NAV_SPY.resolve(&Markup(&[], None));
        c.register(section, options, move |r: &Reveal<'_, &'static str>| {
            nav.borrow_mut().on_section_entered(r.handle);
            Ok(())
        })
        .unwrap();
    }

    deliver(&mut c, &[("home", true)]);
    assert_eq!(nav.borrow().active_href(), Some("#home"));
    deliver(&mut c, &[("home", false), ("skills", true)]);
    assert_eq!(nav.borrow().aria_current(1), Some("page"));
    assert_eq!(nav.borrow().aria_current(0), None);

    // Leaving the band keeps the highlight; re-entering home moves it back.
    deliver(&mut c, &[("skills", false)]);
    assert_eq!(nav.borrow().active(), Some(1));
    deliver(&mut c, &[("home", true)]);
    assert_eq!(nav.borrow().active(), Some(0));
}

#[test]
fn trace_sink_sees_lifecycle() {
    let recorder = Rc::new(RefCell::new(RecorderSink::new()));
    let probe = RevealProbe::new();
    let mut c = controller().with_trace_sink(Box::new(Rc::clone(&recorder)));

    let id = c.register("e", one_shot(), probe.callback()).unwrap();
    c.register(DETACHED, one_shot(), probe.callback());
    deliver(&mut c, &[("e", true)]);

    let recorder = recorder.borrow();
    let events = recorder.events();
    assert!(matches!(events[0], RecordedEvent::Register(e) if e.id == id && !e.rearmed));
    assert!(matches!(events[1], RecordedEvent::Error { .. }));
    assert!(matches!(events[2], RecordedEvent::Reveal(e) if e.cause == RevealCause::Intersection));
    assert!(matches!(events[3], RecordedEvent::Unregister(e) if e.id == id));
    assert!(matches!(events[4], RecordedEvent::Batch(s) if s.revealed == 1));
    assert_eq!(recorder.revealed_ids(), [id]);
}
