// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation highlight driven by section visibility.
//!
//! Each time a section enters the spy band, every link loses
//! `aria-current` and the link whose `href` is `#<section id>` gains it.
//! Leaving the band changes nothing, so the last entered section stays
//! highlighted.

use alloc::string::String;
use alloc::vec::Vec;

/// Value written to `aria-current` on the active link.
pub const ARIA_CURRENT_PAGE: &str = "page";

/// Which navigation link is current.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavSpy {
    hrefs: Vec<String>,
    active: Option<usize>,
}

impl NavSpy {
    /// Creates a spy over links with the given `href`s, in document order.
    #[must_use]
    pub fn new<I>(hrefs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            hrefs: hrefs.into_iter().map(Into::into).collect(),
            active: None,
        }
    }

    /// Index of the current link.
    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    /// `href` of the current link.
    #[must_use]
    pub fn active_href(&self) -> Option<&str> {
        self.active.map(|i| self.hrefs[i].as_str())
    }

    /// `aria-current` value for link `index`, or `None` to remove it.
    #[must_use]
    pub fn aria_current(&self, index: usize) -> Option<&'static str> {
        (self.active == Some(index)).then_some(ARIA_CURRENT_PAGE)
    }

    /// A section entered the spy band.
    ///
    /// Returns whether the current link changed. A section with no matching
    /// link clears the highlight.
    pub fn on_section_entered(&mut self, section_id: &str) -> bool {
        let next = self.hrefs.iter().position(|href| {
            href.strip_prefix('#')
                .is_some_and(|target| target == section_id)
        });
        let changed = next != self.active;
        self.active = next;
        if changed {
            tracing::trace!(section = section_id, link = ?next, "nav link changed");
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spy() -> NavSpy {
        NavSpy::new(["#home", "#skills", "#gaming", "/blog"])
    }

    #[test]
    fn entering_section_marks_its_link() {
        let mut nav = spy();
        assert!(nav.on_section_entered("skills"));
        assert_eq!(nav.active(), Some(1));
        assert_eq!(nav.active_href(), Some("#skills"));
        assert_eq!(nav.aria_current(1), Some("page"));
        assert_eq!(nav.aria_current(0), None);
        assert!(!nav.on_section_entered("skills"), "same section is no change");
    }

    #[test]
    fn unmatched_section_clears_highlight() {
        let mut nav = spy();
        nav.on_section_entered("home");
        assert!(nav.on_section_entered("contact"));
        assert_eq!(nav.active(), None);
        assert!(!nav.on_section_entered("blog"), "only #anchors match");
    }
}
