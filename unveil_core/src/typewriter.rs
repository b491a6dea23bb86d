// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typewriter schedule for the hero heading and its paragraph.
//!
//! The heading is typed first. The paragraph keeps its authored text until
//! its own typing starts, then restarts from empty. Under reduced motion
//! there is no schedule at all and both texts stay as authored.
//!
//! Characters are counted as Unicode scalar values of the trimmed text. The
//! first character of each text appears as soon as its typing starts.

use crate::motion::MotionMode;
use crate::time::Duration;

/// Delay between heading characters.
pub const HEADING_CHAR_DELAY: Duration = Duration::from_millis(26);

/// Delay between paragraph characters.
pub const PARAGRAPH_CHAR_DELAY: Duration = Duration::from_millis(18);

/// Paragraph start delay per heading character.
pub const PARAGRAPH_START_PER_CHAR: Duration = Duration::from_millis(20);

/// Upper bound on the paragraph start delay.
pub const PARAGRAPH_START_CAP: Duration = Duration::from_millis(1200);

/// What one text shows at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Typed {
    /// Typing has not started; the authored text is shown.
    Untouched,
    /// The first `n` characters are shown.
    Chars(usize),
}

impl Typed {
    /// Returns the visible part of `text` (which is trimmed first).
    #[must_use]
    pub fn apply(self, text: &str) -> &str {
        let text = text.trim();
        match self {
            Self::Untouched => text,
            Self::Chars(n) => match text.char_indices().nth(n) {
                Some((end, _)) => &text[..end],
                None => text,
            },
        }
    }
}

/// Visible state of both texts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypewriterFrame {
    /// Heading state.
    pub heading: Typed,
    /// Paragraph state.
    pub paragraph: Typed,
}

/// Precomputed typing schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Typewriter {
    heading_len: usize,
    paragraph_len: usize,
    paragraph_start: Duration,
}

impl Typewriter {
    /// Plans typing for `heading` then `paragraph`.
    ///
    /// Returns `None` under reduced motion.
    #[must_use]
    pub fn new(heading: &str, paragraph: &str, motion: MotionMode) -> Option<Self> {
        if motion.is_reduced() {
            return None;
        }
        let heading_len = heading.trim().chars().count();
        let per_char = scale(PARAGRAPH_START_PER_CHAR, heading_len);
        Some(Self {
            heading_len,
            paragraph_len: paragraph.trim().chars().count(),
            paragraph_start: per_char.min(PARAGRAPH_START_CAP),
        })
    }

    /// When the paragraph starts typing, measured from the heading's start.
    #[must_use]
    pub const fn paragraph_start(&self) -> Duration {
        self.paragraph_start
    }

    /// State of both texts `elapsed` after the heading started.
    #[must_use]
    pub fn frame(&self, elapsed: Duration) -> TypewriterFrame {
        let paragraph = if elapsed < self.paragraph_start {
            Typed::Untouched
        } else {
            Typed::Chars(typed(
                self.paragraph_len,
                PARAGRAPH_CHAR_DELAY,
                elapsed.saturating_sub(self.paragraph_start),
            ))
        };
        TypewriterFrame {
            heading: Typed::Chars(typed(self.heading_len, HEADING_CHAR_DELAY, elapsed)),
            paragraph,
        }
    }

    /// Time at which the last character of either text appears.
    #[must_use]
    pub fn finish_time(&self) -> Duration {
        let heading = scale(HEADING_CHAR_DELAY, self.heading_len.saturating_sub(1));
        let paragraph = self.paragraph_start
            + scale(PARAGRAPH_CHAR_DELAY, self.paragraph_len.saturating_sub(1));
        heading.max(paragraph)
    }

    /// Returns whether both texts are complete.
    #[must_use]
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.finish_time()
    }
}

fn scale(step: Duration, n: usize) -> Duration {
    let n = u64::try_from(n).unwrap_or(u64::MAX);
    Duration(step.micros().saturating_mul(n))
}

fn typed(len: usize, delay: Duration, elapsed: Duration) -> usize {
    if len == 0 {
        return 0;
    }
    let steps = elapsed.micros() / delay.micros().max(1);
    usize::try_from(steps)
        .unwrap_or(usize::MAX)
        .saturating_add(1)
        .min(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADING: &str = "  Hi there  ";
    const PARAGRAPH: &str = "Welcome";

    #[test]
    fn reduced_motion_skips_typing() {
        assert_eq!(Typewriter::new(HEADING, PARAGRAPH, MotionMode::Reduced), None);
    }

    #[test]
    fn heading_types_at_heading_rate() {
        let tw = Typewriter::new(HEADING, PARAGRAPH, MotionMode::Full).unwrap();
        assert_eq!(tw.frame(Duration::ZERO).heading, Typed::Chars(1));
        assert_eq!(tw.frame(Duration::from_millis(25)).heading, Typed::Chars(1));
        assert_eq!(tw.frame(Duration::from_millis(26)).heading, Typed::Chars(2));
        assert_eq!(
            tw.frame(Duration::from_millis(10_000)).heading,
            Typed::Chars(8)
        );
    }

    #[test]
    fn paragraph_waits_twenty_ms_per_heading_char() {
        let tw = Typewriter::new(HEADING, PARAGRAPH, MotionMode::Full).unwrap();
        assert_eq!(tw.paragraph_start(), Duration::from_millis(160));
        assert_eq!(
            tw.frame(Duration::from_millis(159)).paragraph,
            Typed::Untouched
        );
        let started = Duration::from_millis(160);
        assert_eq!(tw.frame(started).paragraph, Typed::Chars(1));
        assert_eq!(
            tw.frame(started + Duration::from_millis(18)).paragraph,
            Typed::Chars(2)
        );
    }

    #[test]
    fn paragraph_start_is_capped() {
        let long = "x".repeat(100);
        let tw = Typewriter::new(&long, PARAGRAPH, MotionMode::Full).unwrap();
        assert_eq!(tw.paragraph_start(), PARAGRAPH_START_CAP);
    }

    #[test]
    fn finish_time_covers_both_texts() {
        let tw = Typewriter::new(HEADING, PARAGRAPH, MotionMode::Full).unwrap();
        // Paragraph: starts at 160 ms, 6 more chars at 18 ms.
        assert_eq!(tw.finish_time(), Duration::from_millis(160 + 6 * 18));
        assert!(!tw.is_finished(Duration::from_millis(267)));
        assert!(tw.is_finished(Duration::from_millis(268)));
    }

    #[test]
    fn typed_prefix_respects_char_boundaries() {
        assert_eq!(Typed::Chars(2).apply("  héllo "), "hé");
        assert_eq!(Typed::Chars(99).apply("abc"), "abc");
        assert_eq!(Typed::Chars(0).apply("abc"), "");
        assert_eq!(Typed::Untouched.apply(" abc "), "abc");
    }

    #[test]
    fn empty_texts_finish_immediately() {
        let tw = Typewriter::new("", "", MotionMode::Full).unwrap();
        assert_eq!(tw.paragraph_start(), Duration::ZERO);
        assert!(tw.is_finished(Duration::ZERO));
        assert_eq!(tw.frame(Duration::ZERO).heading, Typed::Chars(0));
    }
}
