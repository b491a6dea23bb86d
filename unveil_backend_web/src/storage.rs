// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `localStorage`-backed [`StoragePort`].

use alloc::string::String;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

use unveil_core::error::StorageError;
use unveil_core::storage::StoragePort;

/// [`StoragePort`] over `window.localStorage`.
///
/// Storage can be missing entirely (privacy modes, sandboxed iframes). In
/// that case reads return `None` and writes fail with
/// [`StorageError::Unavailable`].
#[derive(Debug)]
pub struct LocalStorage {
    inner: Option<Storage>,
}

impl LocalStorage {
    /// Opens the window's local storage.
    #[must_use]
    pub fn open() -> Self {
        let inner = web_sys::window().and_then(|w| match w.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                tracing::warn!(?err, "localStorage unavailable");
                None
            }
        });
        Self { inner }
    }

    /// Returns whether a backing store was found.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }
}

impl StoragePort for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.inner.as_ref().ok_or(StorageError::Unavailable)?;
        storage.set_item(key, value).map_err(|err| to_storage_error(&err))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let storage = self.inner.as_ref().ok_or(StorageError::Unavailable)?;
        storage.remove_item(key).map_err(|err| to_storage_error(&err))
    }
}

fn to_storage_error(err: &JsValue) -> StorageError {
    match err.dyn_ref::<DomException>() {
        Some(exception) => classify(&exception.name(), exception.message()),
        None => StorageError::Backend(err.as_string().unwrap_or_default()),
    }
}

/// Maps a `DOMException` name to a [`StorageError`].
pub(crate) fn classify(name: &str, message: String) -> StorageError {
    match name {
        "QuotaExceededError" | "NS_ERROR_DOM_QUOTA_REACHED" => StorageError::QuotaExceeded,
        "SecurityError" => StorageError::Unavailable,
        _ => StorageError::Backend(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exception_names_map_to_errors() {
        assert_eq!(
            classify("QuotaExceededError", String::new()),
            StorageError::QuotaExceeded
        );
        assert_eq!(
            classify("NS_ERROR_DOM_QUOTA_REACHED", String::new()),
            StorageError::QuotaExceeded
        );
        assert_eq!(
            classify("SecurityError", String::new()),
            StorageError::Unavailable
        );
        assert_eq!(
            classify("InvalidStateError", "boom".into()),
            StorageError::Backend("boom".into())
        );
    }
}
