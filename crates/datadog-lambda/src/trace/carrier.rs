// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Carrier traits for reading and writing trace headers.
//!
//! Carriers abstract over the shapes inbound events arrive in (a plain header map,
//! a JSON object) so the extractor only needs a key lookup.
//!
//! # Case Insensitivity
//!
//! Lookups ignore ASCII case, since HTTP header names reach the function with
//! whatever casing the client or API gateway chose (`X-Datadog-Trace-Id` vs
//! `x-datadog-trace-id`).

use std::collections::HashMap;

use serde_json::Value;

/// Trait for writing trace headers into a carrier.
///
/// Keys are stored lowercased.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use datadog_lambda::trace::carrier::{Extractor, Injector};
///
/// let mut headers = HashMap::new();
/// headers.set("X-Datadog-Trace-Id", "123456".to_string());
///
/// assert_eq!(Extractor::get(&headers, "x-datadog-trace-id"), Some("123456"));
/// ```
pub trait Injector {
    fn set(&mut self, key: &str, value: String);
}

/// Trait for reading trace headers from a carrier.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use datadog_lambda::trace::carrier::Extractor;
///
/// let headers = json!({ "X-Datadog-Parent-Id": "45678" });
///
/// assert_eq!(Extractor::get(&headers, "x-datadog-parent-id"), Some("45678"));
/// ```
pub trait Extractor {
    /// Gets the value stored under `key`, ignoring ASCII case.
    ///
    /// Returns `None` when the key is missing or its value is not a string.
    fn get(&self, key: &str) -> Option<&str>;
}

impl<S: std::hash::BuildHasher> Injector for HashMap<String, String, S> {
    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_lowercase(), value);
    }
}

impl<S: std::hash::BuildHasher> Extractor for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<&str> {
        // Fast path for already-normalized maps
        if let Some(value) = HashMap::get(self, &key.to_lowercase()) {
            return Some(value.as_str());
        }

        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Only `Value::Object` carries headers. Other variants are ignored.
impl Injector for Value {
    fn set(&mut self, key: &str, value: String) {
        if let Value::Object(map) = self {
            map.insert(key.to_lowercase(), Value::String(value));
        }
    }
}

impl Extractor for Value {
    fn get(&self, key: &str) -> Option<&str> {
        let Value::Object(map) = self else {
            return None;
        };

        let value = match map.get(&key.to_lowercase()) {
            Some(value) => Some(value),
            None => map
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v),
        };

        value.and_then(Value::as_str)
    }
}
