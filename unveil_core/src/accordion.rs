// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timeline accordion: at most one card expanded at a time.

use alloc::format;
use alloc::string::String;

/// Result of clicking a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccordionChange {
    /// The card opened; its details should be shown.
    Expanded(usize),
    /// The card was open and closed again.
    Collapsed(usize),
    /// The index is not a card of this timeline.
    Ignored,
}

/// Expansion state of a row of timeline cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Accordion {
    len: usize,
    expanded: Option<usize>,
}

impl Accordion {
    /// Creates an accordion of `len` collapsed cards.
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self {
            len,
            expanded: None,
        }
    }

    /// Number of cards.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no cards.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The expanded card, if any.
    #[must_use]
    pub const fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    /// Returns whether card `index` is expanded.
    #[must_use]
    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded == Some(index)
    }

    /// `aria-expanded` value for card `index`.
    #[must_use]
    pub fn aria_expanded(&self, index: usize) -> &'static str {
        if self.is_expanded(index) {
            "true"
        } else {
            "false"
        }
    }

    /// Handles a click on card `index`.
    ///
    /// Every other card collapses. The clicked card flips.
    pub fn toggle(&mut self, index: usize) -> AccordionChange {
        if index >= self.len {
            return AccordionChange::Ignored;
        }
        if self.is_expanded(index) {
            self.expanded = None;
            AccordionChange::Collapsed(index)
        } else {
            self.expanded = Some(index);
            AccordionChange::Expanded(index)
        }
    }
}

/// Heading of the detail panel for an expanded card.
#[must_use]
pub fn detail_heading(year: &str, title: &str) -> String {
    format!("{year} \u{2014} {title}")
}
