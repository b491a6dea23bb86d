// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM [`AttributeSource`].

use alloc::string::String;

use web_sys::Element;

use unveil_core::options::AttributeSource;

/// Reads reveal overrides from an element's attributes.
///
/// The inline label is the text of the first `<code>` descendant, as used by
/// skill rows (`<code>85%</code>`).
#[derive(Clone, Copy, Debug)]
pub struct DomAttributes<'a>(pub &'a Element);

impl AttributeSource for DomAttributes<'_> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn label_text(&self) -> Option<String> {
        self.0
            .query_selector("code")
            .ok()
            .flatten()
            .and_then(|code| code.text_content())
    }
}
