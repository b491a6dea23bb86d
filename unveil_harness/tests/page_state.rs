// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page state across a simulated reload.

use unveil_core::app::{AppState, KeyPress, Shortcut};
use unveil_core::motion::MotionMode;
use unveil_core::playback::{PlaybackIntent, PLAYING_KEY, TIME_KEY};
use unveil_core::storage::{MemoryStorage, StoragePort};
use unveil_core::theme::Theme;
use unveil_core::time::{Duration, HostTime};
use unveil_core::tween::{COUNTER_DURATION, Tween, format_compact};
use unveil_core::typewriter::{Typed, Typewriter};

#[test]
fn theme_and_music_survive_reload() {
    let (mut app, restored) = AppState::load(MemoryStorage::new(), false, MotionMode::Full);
    assert_eq!(restored.position, None);
    assert_eq!(app.theme().theme(), Theme::Dark);

    let key = KeyPress {
        key: "t",
        ..KeyPress::default()
    };
    let shortcut = Shortcut::from_key(key).unwrap();
    app.apply(shortcut, true);

    let (playback, storage) = app.playback_mut();
    playback.on_played(HostTime(0), storage);
    assert!(playback.autosave(HostTime(2_500_000), 31.5, storage));

    // Reload: the tab closes while music is playing.
    let storage = app.storage().clone();
    let (mut app, restored) = AppState::load(storage, false, MotionMode::Full);
    assert_eq!(app.theme().theme(), Theme::Light);
    assert_eq!(restored.position, Some(31.5));
    assert!(restored.resume_on_gesture);
    assert!(app.take_resume());
    assert!(!app.take_resume());
}

#[test]
fn pausing_persists_stopped_flag() {
    let (mut app, _) = AppState::load(MemoryStorage::new(), true, MotionMode::Reduced);
    let (playback, storage) = app.playback_mut();
    playback.on_played(HostTime(0), storage);
    assert!(!app.playback_ui().spinning, "no spinner under reduced motion");

    let music = Shortcut::from_key(KeyPress {
        key: "m",
        ..KeyPress::default()
    })
    .unwrap();
    assert_eq!(app.apply(music, false), Some(PlaybackIntent::Pause));
    let (playback, storage) = app.playback_mut();
    playback.on_paused(8.0, storage);

    assert_eq!(app.storage().get(PLAYING_KEY).as_deref(), Some("0"));
    assert_eq!(app.storage().get(TIME_KEY).as_deref(), Some("8"));
    let (_, restored) = AppState::load(app.storage().clone(), true, MotionMode::Full);
    assert!(!restored.resume_on_gesture);
}

#[test]
fn counter_tween_lands_on_compact_target() {
    let full = Tween::new(0.0, 1790.0, COUNTER_DURATION).for_motion(MotionMode::Full);
    assert_eq!(full.rounded_at(COUNTER_DURATION), 1790);
    assert_eq!(format_compact(full.rounded_at(COUNTER_DURATION)), "1.8k");

    let reduced = Tween::new(0.0, 1790.0, COUNTER_DURATION).for_motion(MotionMode::Reduced);
    assert_eq!(reduced.rounded_at(Duration::ZERO), 1790);
}

#[test]
fn hero_typing_follows_page_motion() {
    let heading = "Dev Diary";
    let paragraph = "Notes from the workshop.";

    let (mut app, _) = AppState::load(MemoryStorage::new(), false, MotionMode::Full);
    let typer = Typewriter::new(heading, paragraph, app.motion()).unwrap();
    let frame = typer.frame(Duration::from_millis(110));
    assert_eq!(frame.heading.apply(heading), "Dev D");
    assert_eq!(frame.paragraph, Typed::Untouched);
    assert_eq!(frame.paragraph.apply(paragraph), paragraph);
    let done = typer.frame(typer.finish_time());
    assert_eq!(done.paragraph.apply(paragraph), paragraph);

    app.set_motion(MotionMode::Reduced);
    assert!(Typewriter::new(heading, paragraph, app.motion()).is_none());
}
