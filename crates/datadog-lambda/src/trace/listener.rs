// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::trace::context::{TraceContext, TraceContextStore};
use crate::trace::extractor;

/// Installs the trace context of each invocation.
///
/// `Idle → on_start → Active → on_end → Idle`. Calling `on_start` while active
/// replaces the context.
///
/// The listener serves one invocation at a time. Overlapping invocations on the
/// same listener overwrite each other's context.
#[derive(Debug, Default)]
pub struct Listener {
    store: Arc<TraceContextStore>,
    active: AtomicBool,
}

impl Listener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a listener installing contexts into a shared store.
    #[must_use]
    pub fn with_store(store: Arc<TraceContextStore>) -> Self {
        Self {
            store,
            active: AtomicBool::new(false),
        }
    }

    /// Extracts the trace context from `event` and makes it the active one.
    ///
    /// The previous context is dropped before extraction, so a failed or empty
    /// extraction never leaves a stale context behind. On failure the listener
    /// stays idle.
    pub fn on_start(&self, event: &Value) -> Result<(), Error> {
        self.store.install(None);

        let context = extractor::extract(event)?;
        match &context {
            Some(context) => debug!(
                trace_id = %context.trace_id,
                parent_id = %context.parent_id,
                sample_mode = context.sample_mode,
                "Extracted trace context"
            ),
            None => debug!("No trace context found in event"),
        }
        self.store.install(context);
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Ends the current invocation. The installed context stays readable.
    pub fn on_end(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            debug!("on_end called without an active invocation");
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn trace_context(&self) -> Option<TraceContext> {
        self.store.current()
    }

    #[must_use]
    pub fn store(&self) -> &Arc<TraceContextStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    fn traced_event(trace_id: &str) -> Value {
        json!({
            "headers": {
                "x-datadog-trace-id": trace_id,
                "x-datadog-parent-id": "45678",
                "x-datadog-sampling-priority": "1"
            }
        })
    }

    #[test]
    fn test_lifecycle() {
        let listener = Listener::new();
        assert!(!listener.is_active());

        listener.on_start(&traced_event("12345")).unwrap();
        assert!(listener.is_active());
        assert_eq!(listener.trace_context().unwrap().trace_id, "12345");

        listener.on_end();
        assert!(!listener.is_active());
        // The context outlives the invocation until the next start
        assert_eq!(listener.trace_context().unwrap().trace_id, "12345");
    }

    #[test]
    fn test_on_start_replaces_context() {
        let listener = Listener::new();
        listener.on_start(&traced_event("1")).unwrap();
        listener.on_start(&traced_event("2")).unwrap();
        assert_eq!(listener.trace_context().unwrap().trace_id, "2");
    }

    #[test]
    fn test_on_start_clears_stale_context() {
        let listener = Listener::new();
        listener.on_start(&traced_event("1")).unwrap();
        listener.on_end();

        listener.on_start(&json!({ "headers": {} })).unwrap();
        assert_eq!(listener.trace_context(), None);
    }

    #[test]
    fn test_on_start_parse_failure_clears_context() {
        let listener = Listener::new();
        listener.on_start(&traced_event("1")).unwrap();
        listener.on_end();

        let mut event = traced_event("2");
        event["headers"]["x-datadog-sampling-priority"] = json!("NaN");
        assert!(matches!(
            listener.on_start(&event),
            Err(Error::Parse { .. })
        ));
        assert_eq!(listener.trace_context(), None);
        assert!(!listener.is_active());
    }

    #[test]
    fn test_shared_store() {
        let store = Arc::new(TraceContextStore::new());
        let listener = Listener::with_store(Arc::clone(&store));
        listener.on_start(&traced_event("99")).unwrap();
        assert_eq!(store.current().unwrap().trace_id, "99");
    }

    #[test]
    #[traced_test]
    fn test_on_end_without_start_logs() {
        let listener = Listener::new();
        listener.on_end();
        assert!(logs_contain("on_end called without an active invocation"));
    }
}
