// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Background-music widget state with persisted position.
//!
//! The audio element itself lives outside this crate. [`PlaybackState`]
//! decides what to persist and when, whether a previous session should be
//! resumed, and how the toggle button presents itself. Callers forward the
//! element's `play`/`pause`/`ended` events and sample
//! [`autosave`](PlaybackState::autosave) from a timer or animation frame.
//!
//! Browsers block autoplay until a user gesture, so a session that was left
//! playing is resumed on the first gesture rather than at load.

use alloc::format;

use crate::motion::MotionMode;
use crate::storage::StoragePort;
use crate::time::{Duration, HostTime};

/// Storage key for the last playback position, in seconds.
pub const TIME_KEY: &str = "dd-bgm-time";

/// Storage key for the "was playing" flag (`"1"` / `"0"`).
pub const PLAYING_KEY: &str = "dd-bgm-playing";

/// How often the position is saved while playing.
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_millis(2000);

/// What a toggle request should do to the audio element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackIntent {
    /// Call `play()`.
    Play,
    /// Call `pause()`.
    Pause,
}

/// Presentation of the toggle button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackUi {
    /// Whether the spinner class (`is-playing`) is applied.
    pub spinning: bool,
    /// `aria-pressed` value.
    pub aria_pressed: bool,
    /// `aria-label` text.
    pub aria_label: &'static str,
    /// `title` tooltip.
    pub title: &'static str,
}

/// What was found in storage at startup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Restored {
    /// Position to seek to, if a usable one was saved.
    pub position: Option<f64>,
    /// Whether the previous session was left playing.
    pub resume_on_gesture: bool,
}

/// Playback bookkeeping for the music widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    playing: bool,
    resume_pending: bool,
    last_save: Option<HostTime>,
}

impl PlaybackState {
    /// Reads the saved position and playing flag.
    ///
    /// Only a finite, positive position is returned.
    pub fn restore(storage: &impl StoragePort) -> (Self, Restored) {
        let position = storage
            .get(TIME_KEY)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|t| t.is_finite() && *t > 0.0);
        let resume = storage.get(PLAYING_KEY).as_deref() == Some("1");
        tracing::debug!(?position, resume, "restored playback state");
        (
            Self {
                playing: false,
                resume_pending: resume,
                last_save: None,
            },
            Restored {
                position,
                resume_on_gesture: resume,
            },
        )
    }

    /// Returns whether audio is currently playing.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// Returns whether a resume is still waiting for a user gesture.
    #[must_use]
    pub const fn resume_pending(&self) -> bool {
        self.resume_pending
    }

    /// Consumes the pending resume on the first user gesture.
    ///
    /// Returns `true` exactly once if the previous session was playing; the
    /// caller should then attempt `play()`.
    pub fn take_resume(&mut self) -> bool {
        core::mem::take(&mut self.resume_pending)
    }

    /// What a click or shortcut should do, given the element's `paused` flag.
    #[must_use]
    pub const fn toggle_intent(audio_paused: bool) -> PlaybackIntent {
        if audio_paused {
            PlaybackIntent::Play
        } else {
            PlaybackIntent::Pause
        }
    }

    /// The element started playing.
    pub fn on_played(&mut self, now: HostTime, storage: &mut impl StoragePort) {
        self.playing = true;
        self.resume_pending = false;
        self.last_save = Some(now);
        persist(storage, PLAYING_KEY, "1");
    }

    /// `play()` was rejected (autoplay policy); nothing changes.
    pub fn on_play_blocked(&self) {
        tracing::warn!("background music blocked until a user gesture");
    }

    /// The element paused at `position` seconds.
    pub fn on_paused(&mut self, position: f64, storage: &mut impl StoragePort) {
        self.stop(position, storage);
    }

    /// The element reached the end at `position` seconds.
    pub fn on_ended(&mut self, position: f64, storage: &mut impl StoragePort) {
        self.stop(position, storage);
    }

    /// Returns whether a periodic save is due.
    #[must_use]
    pub fn autosave_due(&self, now: HostTime) -> bool {
        match (self.playing, self.last_save) {
            (true, Some(last)) => now - last >= AUTOSAVE_INTERVAL,
            _ => false,
        }
    }

    /// Saves `position` if playing and the interval has elapsed.
    ///
    /// Returns whether a save happened.
    pub fn autosave(
        &mut self,
        now: HostTime,
        position: f64,
        storage: &mut impl StoragePort,
    ) -> bool {
        if !self.autosave_due(now) {
            return false;
        }
        self.last_save = Some(now);
        save_position(storage, position);
        true
    }

    /// Button presentation. The spinner only turns under full motion.
    #[must_use]
    pub const fn ui(&self, motion: MotionMode) -> PlaybackUi {
        if self.playing {
            PlaybackUi {
                spinning: !motion.is_reduced(),
                aria_pressed: true,
                aria_label: "Pause background music",
                title: "Pause (M)",
            }
        } else {
            PlaybackUi {
                spinning: false,
                aria_pressed: false,
                aria_label: "Play background music",
                title: "Play (M)",
            }
        }
    }

    fn stop(&mut self, position: f64, storage: &mut impl StoragePort) {
        self.playing = false;
        self.last_save = None;
        persist(storage, PLAYING_KEY, "0");
        save_position(storage, position);
    }
}

fn save_position(storage: &mut impl StoragePort, position: f64) {
    let position = if position.is_finite() && position > 0.0 {
        position
    } else {
        0.0
    };
    persist(storage, TIME_KEY, &format!("{position}"));
}

fn persist(storage: &mut impl StoragePort, key: &str, value: &str) {
    if let Err(err) = storage.set(key, value) {
        tracing::warn!(key, error = %err, "could not persist playback state");
    }
}
