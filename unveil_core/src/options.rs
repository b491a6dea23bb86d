// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration options, presets, and one-time payload resolution.
//!
//! A [`RevealOptions`] value is fixed at registration. Anything an element
//! carries in markup (`data-threshold`, `data-level`, `data-count`, ...) is
//! read exactly once through an [`AttributeSource`] by
//! [`RevealPreset::resolve`], so reveal callbacks never re-derive it.
//!
//! # Presets
//!
//! The presets mirror what the site uses for each kind of element:
//!
//! | preset | threshold | root margin | one-shot | payload |
//! |---|---|---|---|---|
//! | [`SECTION`](RevealPreset::SECTION) | 0.08 | `-12% 0px` | yes | stagger |
//! | [`SKILL`](RevealPreset::SKILL) | 0.35 | - | yes | level |
//! | [`COUNTER`](RevealPreset::COUNTER) | 0.55 | - | yes | count |
//! | [`LAZY_IMAGE`](RevealPreset::LAZY_IMAGE) | 0.01 | `200px 0px` | yes | - |
//! | [`NAV_SPY`](RevealPreset::NAV_SPY) | 0.01 | `-45% 0px -50% 0px` | no | - |

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

use crate::error::RevealError;

/// Fraction of an element's area that must be visible before it counts as
/// intersecting. Always within `0.0..=1.0`.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f32", into = "f32"))]
pub struct Threshold(f32);

impl Threshold {
    /// The default trigger threshold (10% visible).
    pub const DEFAULT: Self = Self(0.1);

    /// Creates a threshold, rejecting NaN and values outside `0.0..=1.0`.
    pub fn new(value: f32) -> Result<Self, RevealError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RevealError::InvalidThreshold(value))
        }
    }

    /// Creates a threshold from a compile-time constant.
    ///
    /// # Panics
    ///
    /// Panics (at compile time in const context) if `value` is out of range.
    #[must_use]
    pub const fn from_const(value: f32) -> Self {
        assert!(value >= 0.0 && value <= 1.0, "threshold out of range");
        Self(value)
    }

    /// Returns the raw fraction.
    #[inline]
    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Threshold({})", self.0)
    }
}

impl TryFrom<f32> for Threshold {
    type Error = RevealError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for f32 {
    fn from(value: Threshold) -> Self {
        value.0
    }
}

/// Caller data attached to a watched element, resolved once at registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RevealPayload {
    /// Nothing attached.
    #[default]
    None,
    /// Skill-bar fill level, percent in `0..=100`.
    Level(u8),
    /// Target value for a stat counter.
    Count(u64),
    /// Stagger multiplier applied by the caller to its own delay.
    Stagger(u32),
}

/// Which payload a preset extracts from markup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PayloadKind {
    /// Do not read a payload.
    #[default]
    None,
    /// Read a [`RevealPayload::Level`].
    Level,
    /// Read a [`RevealPayload::Count`] from `data-count`.
    Count,
    /// Read a [`RevealPayload::Stagger`] from `data-delay`.
    Stagger,
}

/// What the visibility source needs to know to monitor an element.
#[derive(Clone, Debug, PartialEq)]
pub struct ObserveOptions<'a> {
    /// Intersection ratio that counts as "visible".
    pub threshold: Threshold,
    /// CSS-style margin applied to the viewport, e.g. `"-12% 0px"`.
    /// Empty means no margin.
    pub root_margin: &'a str,
}

/// Options fixed for a watched element at registration time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevealOptions {
    /// Trigger threshold. Defaults to [`Threshold::DEFAULT`].
    pub threshold: Threshold,
    /// Viewport margin passed through to the visibility source.
    pub root_margin: Cow<'static, str>,
    /// Reveal once and stop monitoring (`true`), or toggle with visibility.
    pub one_shot: bool,
    /// Caller data handed back on reveal.
    pub payload: RevealPayload,
}

impl RevealOptions {
    /// Default options: 10% threshold, no margin, one-shot, no payload.
    pub const DEFAULT: Self = Self {
        threshold: Threshold::DEFAULT,
        root_margin: Cow::Borrowed(""),
        one_shot: true,
        payload: RevealPayload::None,
    };

    /// Returns these options with a different threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    /// Returns these options with the given one-shot policy.
    #[must_use]
    pub fn with_one_shot(mut self, one_shot: bool) -> Self {
        self.one_shot = one_shot;
        self
    }

    /// Returns these options with the given payload.
    #[must_use]
    pub fn with_payload(mut self, payload: RevealPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Returns these options with the given root margin.
    #[must_use]
    pub fn with_root_margin(mut self, margin: impl Into<Cow<'static, str>>) -> Self {
        self.root_margin = margin.into();
        self
    }

    /// Borrows the parts the visibility source needs.
    #[must_use]
    pub fn observe_options(&self) -> ObserveOptions<'_> {
        ObserveOptions {
            threshold: self.threshold,
            root_margin: &self.root_margin,
        }
    }
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Read-only access to an element's markup attributes.
///
/// The web backend implements this over a DOM `Element`; tests use a map.
pub trait AttributeSource {
    /// Returns the value of the named attribute, if present.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Returns the text of the element's inline value label (the `<code>`
    /// child of a skill row), if any.
    fn label_text(&self) -> Option<String> {
        None
    }
}

/// Base options plus the payload kind to extract from markup.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevealPreset {
    /// Options used when markup does not override them.
    pub options: RevealOptions,
    /// Payload read by [`resolve`](Self::resolve).
    pub payload: PayloadKind,
}

impl RevealPreset {
    /// Page sections that fade in while scrolling.
    pub const SECTION: Self = Self {
        options: RevealOptions {
            threshold: Threshold::from_const(0.08),
            root_margin: Cow::Borrowed("-12% 0px"),
            one_shot: true,
            payload: RevealPayload::None,
        },
        payload: PayloadKind::Stagger,
    };

    /// Skill rows whose bar fills to a percentage.
    pub const SKILL: Self = Self {
        options: RevealOptions {
            threshold: Threshold::from_const(0.35),
            root_margin: Cow::Borrowed(""),
            one_shot: true,
            payload: RevealPayload::None,
        },
        payload: PayloadKind::Level,
    };

    /// Stat counters that count up to a target.
    pub const COUNTER: Self = Self {
        options: RevealOptions {
            threshold: Threshold::from_const(0.55),
            root_margin: Cow::Borrowed(""),
            one_shot: true,
            payload: RevealPayload::None,
        },
        payload: PayloadKind::Count,
    };

    /// Images whose source is swapped in shortly before they scroll in.
    pub const LAZY_IMAGE: Self = Self {
        options: RevealOptions {
            threshold: Threshold::from_const(0.01),
            root_margin: Cow::Borrowed("200px 0px"),
            one_shot: true,
            payload: RevealPayload::None,
        },
        payload: PayloadKind::None,
    };

    /// Sections tracked for the navigation highlight. Toggles with visibility.
    pub const NAV_SPY: Self = Self {
        options: RevealOptions {
            threshold: Threshold::from_const(0.01),
            root_margin: Cow::Borrowed("-45% 0px -50% 0px"),
            one_shot: false,
            payload: RevealPayload::None,
        },
        payload: PayloadKind::None,
    };

    /// Resolves final options for one element.
    ///
    /// `data-threshold` and `data-once` override the preset; malformed values
    /// are logged and ignored. The payload is read according to
    /// [`payload`](Self::payload).
    #[must_use]
    pub fn resolve(&self, attrs: &impl AttributeSource) -> RevealOptions {
        let mut options = self.options.clone();

        if let Some(raw) = attrs.attribute("data-threshold") {
            match raw.trim().parse::<f32>() {
                Ok(value) => match Threshold::new(value) {
                    Ok(threshold) => options.threshold = threshold,
                    Err(err) => tracing::warn!(error = %err, "ignoring data-threshold"),
                },
                Err(_) => tracing::warn!(value = %raw, "unparseable data-threshold"),
            }
        }

        if let Some(raw) = attrs.attribute("data-once") {
            match raw.trim() {
                "" | "true" | "1" => options.one_shot = true,
                "false" | "0" => options.one_shot = false,
                other => tracing::warn!(value = %other, "unrecognized data-once"),
            }
        }

        options.payload = resolve_payload(self.payload, attrs);
        options
    }
}

/// Reads a payload of the given kind from markup.
///
/// Skill levels come from the first non-empty of `data-level`, `data-skill`
/// and `aria-valuenow`. If that value is zero or unparseable the `NN%` label
/// is used instead; later attributes are not consulted. The result is
/// clamped to `0..=100`.
#[must_use]
pub fn resolve_payload(kind: PayloadKind, attrs: &impl AttributeSource) -> RevealPayload {
    match kind {
        PayloadKind::None => RevealPayload::None,
        PayloadKind::Level => {
            // Only the first non-empty attribute is read, even when it
            // parses to zero; the label is the sole fallback.
            let level = ["data-level", "data-skill", "aria-valuenow"]
                .into_iter()
                .filter_map(|name| attrs.attribute(name))
                .find(|raw| !raw.is_empty())
                .and_then(|raw| parse_number(&raw))
                .filter(|value| *value != 0.0)
                .or_else(|| attrs.label_text().and_then(|raw| parse_number(&raw)))
                .unwrap_or(0.0);
            RevealPayload::Level(clamp_percent(level))
        }
        PayloadKind::Count => {
            let count = attrs
                .attribute("data-count")
                .and_then(|raw| parse_number(&raw))
                .filter(|value| *value > 0.0)
                .unwrap_or(0.0);
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "positive and finite; saturating float-to-int cast is fine"
            )]
            let count = count as u64;
            RevealPayload::Count(count)
        }
        PayloadKind::Stagger => {
            let delay = attrs
                .attribute("data-delay")
                .and_then(|raw| raw.trim().parse::<u32>().ok())
                .unwrap_or(0);
            RevealPayload::Stagger(delay)
        }
    }
}

/// Parses a number the way markup writes it: optional whitespace and an
/// optional trailing `%`. Non-finite values are rejected.
fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn clamp_percent(value: f64) -> u8 {
    let clamped = value.clamp(0.0, 100.0);
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clamped to 0..=100 above"
    )]
    let out = (clamped + 0.5) as u8;
    out.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::string::ToString;

    #[derive(Default)]
    struct Attrs {
        map: BTreeMap<&'static str, &'static str>,
        label: Option<&'static str>,
    }

    impl Attrs {
        fn with(mut self, name: &'static str, value: &'static str) -> Self {
            self.map.insert(name, value);
            self
        }
    }

    impl AttributeSource for Attrs {
        fn attribute(&self, name: &str) -> Option<String> {
            self.map.get(name).map(|v| (*v).to_string())
        }

        fn label_text(&self) -> Option<String> {
            self.label.map(ToString::to_string)
        }
    }

    #[test]
    fn threshold_rejects_out_of_range() {
        assert!(Threshold::new(0.0).is_ok());
        assert!(Threshold::new(1.0).is_ok());
        assert!(matches!(
            Threshold::new(1.5),
            Err(RevealError::InvalidThreshold(_))
        ));
        assert!(Threshold::new(f32::NAN).is_err());
        assert!(Threshold::new(-0.1).is_err());
    }

    #[test]
    fn default_options() {
        let options = RevealOptions::default();
        assert_eq!(options.threshold, Threshold::DEFAULT);
        assert!(options.one_shot);
        assert_eq!(options.payload, RevealPayload::None);
        assert_eq!(options.observe_options().root_margin, "");
    }

    #[test]
    fn level_prefers_data_level() {
        let attrs = Attrs::default()
            .with("data-level", "80")
            .with("data-skill", "20");
        assert_eq!(
            resolve_payload(PayloadKind::Level, &attrs),
            RevealPayload::Level(80)
        );
    }

    #[test]
    fn zero_level_skips_to_label() {
        let attrs = Attrs {
            label: Some("72%"),
            ..Attrs::default()
        }
        .with("data-level", "0")
        .with("data-skill", "40")
        .with("aria-valuenow", "65");
        assert_eq!(
            resolve_payload(PayloadKind::Level, &attrs),
            RevealPayload::Level(72)
        );

        let unlabeled = Attrs::default()
            .with("data-level", "0")
            .with("data-skill", "40");
        assert_eq!(
            resolve_payload(PayloadKind::Level, &unlabeled),
            RevealPayload::Level(0)
        );
    }

    #[test]
    fn empty_level_attributes_are_skipped() {
        let attrs = Attrs::default()
            .with("data-level", "")
            .with("data-skill", "")
            .with("aria-valuenow", "65");
        assert_eq!(
            resolve_payload(PayloadKind::Level, &attrs),
            RevealPayload::Level(65)
        );

        let garbage = Attrs {
            label: Some("30%"),
            ..Attrs::default()
        }
        .with("data-skill", "abc")
        .with("aria-valuenow", "65");
        assert_eq!(
            resolve_payload(PayloadKind::Level, &garbage),
            RevealPayload::Level(30)
        );
    }

    #[test]
    fn level_reads_label_and_clamps() {
        let attrs = Attrs {
            label: Some(" 140% "),
            ..Attrs::default()
        };
        assert_eq!(
            resolve_payload(PayloadKind::Level, &attrs),
            RevealPayload::Level(100)
        );

        let empty = Attrs::default();
        assert_eq!(
            resolve_payload(PayloadKind::Level, &empty),
            RevealPayload::Level(0)
        );
    }

    #[test]
    fn count_and_stagger() {
        let attrs = Attrs::default()
            .with("data-count", "1250")
            .with("data-delay", "3");
        assert_eq!(
            resolve_payload(PayloadKind::Count, &attrs),
            RevealPayload::Count(1250)
        );
        assert_eq!(
            resolve_payload(PayloadKind::Stagger, &attrs),
            RevealPayload::Stagger(3)
        );
        assert_eq!(
            resolve_payload(PayloadKind::Count, &Attrs::default()),
            RevealPayload::Count(0)
        );
    }

    #[test]
    fn preset_overrides_from_markup() {
        let attrs = Attrs::default()
            .with("data-threshold", "0.5")
            .with("data-once", "false")
            .with("data-level", "42");
        let options = RevealPreset::SKILL.resolve(&attrs);
        assert_eq!(options.threshold.get(), 0.5);
        assert!(!options.one_shot);
        assert_eq!(options.payload, RevealPayload::Level(42));
    }

    #[test]
    fn preset_ignores_bad_overrides() {
        let attrs = Attrs::default()
            .with("data-threshold", "2")
            .with("data-once", "maybe");
        let options = RevealPreset::COUNTER.resolve(&attrs);
        assert_eq!(options.threshold, Threshold::from_const(0.55));
        assert!(options.one_shot);
    }

    #[test]
    fn nav_spy_is_not_one_shot() {
        let options = RevealPreset::NAV_SPY.resolve(&Attrs::default());
        assert!(!options.one_shot);
        assert_eq!(options.root_margin, "-45% 0px -50% 0px");
    }
}
