// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Light/dark theme preference with persisted explicit choice.
//!
//! The initial theme is the saved choice if there is one, otherwise the
//! system color scheme. System changes are followed only until the user
//! picks a theme explicitly; after that the saved choice wins.

use crate::storage::StoragePort;

/// Storage key for the explicit theme choice.
pub const THEME_KEY: &str = "dd-theme";

/// Page color theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Theme {
    /// Light background.
    Light,
    /// Dark background.
    #[default]
    Dark,
}

impl Theme {
    /// Value written to `data-theme` and to storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parses a stored value. Anything unrecognized is `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Theme implied by `prefers-color-scheme: light`.
    #[must_use]
    pub const fn from_prefers_light(prefers_light: bool) -> Self {
        if prefers_light { Self::Light } else { Self::Dark }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Content for `<meta name="theme-color">`.
    #[must_use]
    pub const fn meta_color(self) -> &'static str {
        match self {
            Self::Light => "#f6f8fc",
            Self::Dark => "#05070b",
        }
    }

    /// Glyph shown on the toggle button.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Light => "\u{1F31E}",
            Self::Dark => "\u{1F319}",
        }
    }

    /// `aria-pressed` value for the toggle (pressed means dark).
    #[must_use]
    pub const fn aria_pressed(self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// Current theme and whether it was chosen explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeState {
    theme: Theme,
    explicit: bool,
}

impl ThemeState {
    /// Loads the saved choice, falling back to the system preference.
    ///
    /// Nothing is written: a theme derived from the system stays implicit.
    #[must_use]
    pub fn load(storage: &impl StoragePort, prefers_light: bool) -> Self {
        match storage.get(THEME_KEY).as_deref().and_then(Theme::parse) {
            Some(theme) => Self {
                theme,
                explicit: true,
            },
            None => Self {
                theme: Theme::from_prefers_light(prefers_light),
                explicit: false,
            },
        }
    }

    /// Returns the active theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Returns whether the user picked the theme.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Sets and persists an explicit theme.
    ///
    /// A failed write is logged; the in-memory theme still changes.
    pub fn set(&mut self, theme: Theme, storage: &mut impl StoragePort) {
        self.theme = theme;
        self.explicit = true;
        if let Err(err) = storage.set(THEME_KEY, theme.as_str()) {
            tracing::warn!(error = %err, "could not persist theme");
        }
    }

    /// Flips the theme, persists it, and returns the new value.
    pub fn toggle(&mut self, storage: &mut impl StoragePort) -> Theme {
        let next = self.theme.toggled();
        self.set(next, storage);
        next
    }

    /// Follows a system color-scheme change unless the user chose a theme.
    ///
    /// Returns whether the active theme changed.
    pub fn on_system_change(&mut self, prefers_light: bool) -> bool {
        if self.explicit {
            return false;
        }
        let next = Theme::from_prefers_light(prefers_light);
        let changed = next != self.theme;
        self.theme = next;
        changed
    }
}
