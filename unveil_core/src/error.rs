// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! None of these escape the controller's public methods: registration errors
//! and callback failures are logged and reported to the trace sink, then
//! absorbed. They exist so callbacks and sinks have something typed to
//! return and inspect.

use alloc::string::String;

use crate::element::ElementId;

/// Errors raised while registering or revealing elements.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RevealError {
    /// The visibility source rejected the element handle.
    #[error("invalid or missing element handle")]
    InvalidElement,
    /// A caller's reveal callback reported a failure.
    #[error("reveal callback for {id} failed: {message}")]
    Callback {
        /// Element whose callback failed.
        id: ElementId,
        /// Caller-provided description.
        message: String,
    },
    /// A threshold outside `0.0..=1.0` (or NaN) was supplied.
    #[error("threshold {0} is outside 0.0..=1.0")]
    InvalidThreshold(f32),
}

impl RevealError {
    /// Convenience constructor for callback failures.
    #[must_use]
    pub fn callback(id: ElementId, message: impl Into<String>) -> Self {
        Self::Callback {
            id,
            message: message.into(),
        }
    }
}

/// Errors raised by a [`StoragePort`](crate::storage::StoragePort).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Storage is not available (private mode, disabled, no window).
    #[error("storage unavailable")]
    Unavailable,
    /// The backing store refused the write for lack of space.
    #[error("storage quota exceeded")]
    QuotaExceeded,
    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}
