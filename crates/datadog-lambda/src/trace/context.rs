// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::trace::carrier::Injector;
use crate::trace::{DATADOG_PARENT_ID_KEY, DATADOG_SAMPLING_PRIORITY_KEY, DATADOG_TRACE_ID_KEY};

/// Trace identifiers propagated into the current invocation.
///
/// A context is always complete: the extractor either finds all three headers
/// or produces no context at all.
///
/// # Sampling Priority
///
/// - **-1**: User reject
/// - **0**: Auto reject
/// - **1**: Auto keep
/// - **2**: User keep
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// Decimal trace identifier, as received.
    pub trace_id: String,
    /// Decimal identifier of the calling span, as received.
    pub parent_id: String,
    pub sample_mode: i8,
}

impl TraceContext {
    /// Writes the context as Datadog headers, e.g. onto an outbound request.
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use datadog_lambda::TraceContext;
    ///
    /// let context = TraceContext {
    ///     trace_id: "12345".to_string(),
    ///     parent_id: "45678".to_string(),
    ///     sample_mode: 1,
    /// };
    /// let mut headers: HashMap<String, String> = HashMap::new();
    /// context.inject(&mut headers);
    ///
    /// assert_eq!(headers["x-datadog-sampling-priority"], "1");
    /// ```
    pub fn inject(&self, carrier: &mut dyn Injector) {
        carrier.set(DATADOG_TRACE_ID_KEY, self.trace_id.clone());
        carrier.set(DATADOG_PARENT_ID_KEY, self.parent_id.clone());
        carrier.set(DATADOG_SAMPLING_PRIORITY_KEY, self.sample_mode.to_string());
    }
}

/// Holder of the active [`TraceContext`].
///
/// The stored value stays readable after the invocation ends and is only
/// replaced by the next [`TraceContextStore::install`].
#[derive(Debug, Default)]
pub struct TraceContextStore {
    current: RwLock<Option<TraceContext>>,
}

impl TraceContextStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored context. `None` clears it.
    pub fn install(&self, context: Option<TraceContext>) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = context;
    }

    #[must_use]
    pub fn current(&self) -> Option<TraceContext> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn context() -> TraceContext {
        TraceContext {
            trace_id: "12345".to_string(),
            parent_id: "45678".to_string(),
            sample_mode: 2,
        }
    }

    #[test]
    fn test_store_starts_empty() {
        let store = TraceContextStore::new();
        assert_eq!(store.current(), None);
    }

    #[test]
    fn test_store_install_replaces() {
        let store = TraceContextStore::new();
        store.install(Some(context()));
        assert_eq!(store.current(), Some(context()));

        let next = TraceContext {
            trace_id: "1".to_string(),
            parent_id: "2".to_string(),
            sample_mode: 0,
        };
        store.install(Some(next.clone()));
        assert_eq!(store.current(), Some(next));

        store.install(None);
        assert_eq!(store.current(), None);
    }

    #[test]
    fn test_store_reads_are_stable() {
        let store = TraceContextStore::new();
        store.install(Some(context()));
        assert_eq!(store.current(), store.current());
    }

    #[test]
    fn test_inject_headers() {
        let mut headers: HashMap<String, String> = HashMap::new();
        context().inject(&mut headers);

        assert_eq!(headers.len(), 3);
        assert_eq!(headers["x-datadog-trace-id"], "12345");
        assert_eq!(headers["x-datadog-parent-id"], "45678");
        assert_eq!(headers["x-datadog-sampling-priority"], "2");
    }

    #[test]
    fn test_serialize_shape() {
        assert_eq!(
            serde_json::to_value(context()).unwrap(),
            json!({"trace_id": "12345", "parent_id": "45678", "sample_mode": 2})
        );
    }
}
