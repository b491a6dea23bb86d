// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-level state shared by the widgets.
//!
//! [`AppState`] owns the storage port together with the theme, playback and
//! motion state. Event handlers borrow it mutably for the duration of one
//! event; there is no global.

use crate::motion::MotionMode;
use crate::playback::{PlaybackIntent, PlaybackState, PlaybackUi, Restored};
use crate::storage::StoragePort;
use crate::theme::{Theme, ThemeState};

/// Keyboard shortcuts understood by the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shortcut {
    /// `t`: toggle the color theme.
    ToggleTheme,
    /// `m`: play or pause the background music.
    ToggleMusic,
    /// `h`: scroll to the home section.
    GoHome,
    /// `s`: scroll to the skills section.
    GoSkills,
    /// `g`: scroll to the gaming section.
    GoGaming,
}

/// A key press as seen by the page's `keydown` listener.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyPress<'a> {
    /// `KeyboardEvent.key`.
    pub key: &'a str,
    /// Any of meta, ctrl or alt held.
    pub modified: bool,
    /// The event target is a text field or editable region.
    pub in_editable: bool,
}

impl Shortcut {
    /// Maps a key press to a shortcut.
    ///
    /// Presses with meta/ctrl/alt held, or typed into an editable target,
    /// never match.
    #[must_use]
    pub fn from_key(press: KeyPress<'_>) -> Option<Self> {
        if press.modified || press.in_editable {
            return None;
        }
        match press.key {
            "t" | "T" => Some(Self::ToggleTheme),
            "m" | "M" => Some(Self::ToggleMusic),
            "h" | "H" => Some(Self::GoHome),
            "s" | "S" => Some(Self::GoSkills),
            "g" | "G" => Some(Self::GoGaming),
            _ => None,
        }
    }

    /// Anchor a navigation shortcut scrolls to.
    #[must_use]
    pub const fn anchor(self) -> Option<&'static str> {
        match self {
            Self::GoHome => Some("#home"),
            Self::GoSkills => Some("#skills"),
            Self::GoGaming => Some("#gaming"),
            Self::ToggleTheme | Self::ToggleMusic => None,
        }
    }
}

/// Theme, playback and motion state plus the port they persist through.
#[derive(Debug)]
pub struct AppState<S: StoragePort> {
    storage: S,
    theme: ThemeState,
    playback: PlaybackState,
    motion: MotionMode,
}

impl<S: StoragePort> AppState<S> {
    /// Loads persisted state.
    ///
    /// Returns the state and whatever the playback restore found, so the
    /// caller can seek the audio element before the first gesture.
    pub fn load(storage: S, prefers_light: bool, motion: MotionMode) -> (Self, Restored) {
        let theme = ThemeState::load(&storage, prefers_light);
        let (playback, restored) = PlaybackState::restore(&storage);
        tracing::debug!(theme = theme.theme().as_str(), ?motion, "page state loaded");
        (
            Self {
                storage,
                theme,
                playback,
                motion,
            },
            restored,
        )
    }

    /// Returns the storage port.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the storage port mutably.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Returns the theme state.
    #[must_use]
    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    /// Returns the playback state.
    #[must_use]
    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Returns the current motion mode.
    #[must_use]
    pub fn motion(&self) -> MotionMode {
        self.motion
    }

    /// Records a motion preference change.
    pub fn set_motion(&mut self, motion: MotionMode) {
        self.motion = motion;
    }

    /// Flips and persists the theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle(&mut self.storage)
    }

    /// Follows a system color-scheme change. Returns whether it applied.
    pub fn on_system_theme_change(&mut self, prefers_light: bool) -> bool {
        self.theme.on_system_change(prefers_light)
    }

    /// Consumes the pending resume on the first gesture.
    pub fn take_resume(&mut self) -> bool {
        self.playback.take_resume()
    }

    /// Playback state mutably, paired with the storage it persists to.
    pub fn playback_mut(&mut self) -> (&mut PlaybackState, &mut S) {
        (&mut self.playback, &mut self.storage)
    }

    /// Music toggle button presentation under the current motion mode.
    #[must_use]
    pub fn playback_ui(&self) -> PlaybackUi {
        self.playback.ui(self.motion)
    }

    /// Applies a shortcut.
    ///
    /// The theme is toggled here. For music the caller acts on the returned
    /// intent and later reports the element's `play`/`pause` event.
    /// Navigation shortcuts change no state; the caller scrolls to
    /// [`Shortcut::anchor`].
    pub fn apply(&mut self, shortcut: Shortcut, audio_paused: bool) -> Option<PlaybackIntent> {
        match shortcut {
            Shortcut::ToggleTheme => {
                let theme = self.toggle_theme();
                tracing::debug!(theme = theme.as_str(), "theme toggled");
                None
            }
            Shortcut::ToggleMusic => Some(PlaybackState::toggle_intent(audio_paused)),
            Shortcut::GoHome | Shortcut::GoSkills | Shortcut::GoGaming => None,
        }
    }
}
