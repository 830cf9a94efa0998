// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Invocation wrapper.
//!
//! Wraps a handler call so that, for every invocation:
//!
//! ```text
//! Listener::on_start(event)      trace context installed
//!   ↓
//! record `invocations`
//!   ↓
//! handler()
//!   ↓ (Err)          ↓ (Ok)
//! record `errors`    │
//!   ↓                ↓
//! Listener::on_end   (guard drop, every exit path)
//!   ↓
//! cold start cleared
//!   ↓
//! result returned unchanged
//! ```
//!
//! The wrapper serves one invocation at a time, which is how the Lambda runtime
//! drives a sandbox. Overlapping invocations on one wrapper share its trace
//! context and cold start state.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, debug_span, warn, Instrument};

use crate::config::Config;
use crate::context::InvocationContext;
use crate::error::Error;
use crate::metrics::emitter::{MetricEmitter, MetricValue};
use crate::metrics::enhanced::{ColdStart, EnhancedTags, ERRORS_METRIC, INVOCATIONS_METRIC};
use crate::trace::context::TraceContext;
use crate::trace::listener::Listener;

/// Instruments handler invocations with trace context and enhanced metrics.
#[derive(Debug, Default)]
pub struct LambdaWrapper {
    config: Config,
    listener: Listener,
    cold_start: ColdStart,
    emitter: MetricEmitter,
}

impl LambdaWrapper {
    /// Creates a wrapper emitting metrics to standard output.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_emitter(config, MetricEmitter::stdout())
    }

    #[must_use]
    pub fn with_emitter(config: Config, emitter: MetricEmitter) -> Self {
        Self {
            config,
            listener: Listener::new(),
            cold_start: ColdStart::new(),
            emitter,
        }
    }

    /// Runs `handler` as one instrumented invocation.
    ///
    /// The handler's result is returned unchanged. If the trace headers of
    /// `event` cannot be decoded the handler is not run and the extraction error
    /// is returned, converted into the handler's error type.
    ///
    /// ```
    /// use serde_json::json;
    /// use datadog_lambda::{Config, LambdaContext, LambdaWrapper};
    ///
    /// let wrapper = LambdaWrapper::new(Config::default());
    /// let context = LambdaContext {
    ///     invoked_function_arn: "arn:aws:lambda:us-east-1:123456789012:function:f".to_string(),
    ///     function_name: "f".to_string(),
    ///     memory_limit_in_mb: 128,
    /// };
    ///
    /// let result: Result<u32, datadog_lambda::Error> =
    ///     wrapper.wrap(&json!({}), &context, || Ok(100));
    /// assert_eq!(result.unwrap(), 100);
    /// ```
    pub fn wrap<C, T, E, F>(&self, event: &Value, context: &C, handler: F) -> Result<T, E>
    where
        C: InvocationContext + ?Sized,
        F: FnOnce() -> Result<T, E>,
        E: From<Error>,
    {
        let span = debug_span!("invocation", function = context.function_name());
        let guard = span.in_scope(|| self.start(event, context))?;

        let result = span.in_scope(handler);
        guard.finish(result.is_err());
        result
    }

    /// Runs the future returned by `handler` as one instrumented invocation.
    ///
    /// Same guarantees as [`LambdaWrapper::wrap`]. If the returned future is
    /// dropped before completing, `on_end` still runs.
    pub async fn wrap_async<C, T, E, F, Fut>(
        &self,
        event: &Value,
        context: &C,
        handler: F,
    ) -> Result<T, E>
    where
        C: InvocationContext + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<Error>,
    {
        let span = debug_span!("invocation", function = context.function_name());
        let guard = span.in_scope(|| self.start(event, context))?;

        let result = handler().instrument(span).await;
        guard.finish(result.is_err());
        result
    }

    /// Trace context of the current (or most recent) invocation.
    #[must_use]
    pub fn trace_context(&self) -> Option<TraceContext> {
        self.listener.trace_context()
    }

    /// Whether no invocation has completed on this wrapper yet.
    #[must_use]
    pub fn is_cold_start(&self) -> bool {
        self.cold_start.is_cold()
    }

    #[must_use]
    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Emits a custom metric through this wrapper's emitter.
    pub fn metric<I, K, V>(
        &self,
        name: &str,
        value: impl Into<MetricValue>,
        time: Option<DateTime<Utc>>,
        tags: I,
    ) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: std::fmt::Display,
        V: std::fmt::Display,
    {
        self.emitter.metric(name, value, time, tags)
    }

    /// Emits `metric_name` with value 1, tagged with the function identity and
    /// cold start state.
    pub fn record_enhanced<C>(&self, metric_name: &str, context: &C) -> Result<(), Error>
    where
        C: InvocationContext + ?Sized,
    {
        let tags = EnhancedTags::new(context, self.cold_start.is_cold());
        self.emitter.metric(metric_name, 1, None, tags.to_tags())
    }

    fn start<'a, C>(
        &'a self,
        event: &Value,
        context: &'a C,
    ) -> Result<InvocationGuard<'a, C>, Error>
    where
        C: InvocationContext + ?Sized,
    {
        self.listener.on_start(event)?;
        let guard = InvocationGuard {
            wrapper: self,
            context,
            finished: false,
        };
        self.record(INVOCATIONS_METRIC, context);
        Ok(guard)
    }

    /// Enhanced metrics are fire-and-forget: a failed write must not fail the
    /// invocation.
    fn record<C>(&self, metric_name: &str, context: &C)
    where
        C: InvocationContext + ?Sized,
    {
        if !self.config.enhanced_metrics {
            return;
        }
        if let Err(e) = self.record_enhanced(metric_name, context) {
            warn!("Failed to record enhanced metric {metric_name}: {e}");
        }
    }
}

/// Ends the invocation when dropped, on every exit path.
///
/// A drop during a panic counts as a failed invocation.
struct InvocationGuard<'a, C: InvocationContext + ?Sized> {
    wrapper: &'a LambdaWrapper,
    context: &'a C,
    finished: bool,
}

impl<C: InvocationContext + ?Sized> InvocationGuard<'_, C> {
    fn finish(mut self, failed: bool) {
        if failed {
            self.wrapper.record(ERRORS_METRIC, self.context);
        }
        self.finished = true;
    }
}

impl<C: InvocationContext + ?Sized> Drop for InvocationGuard<'_, C> {
    fn drop(&mut self) {
        if !self.finished {
            if std::thread::panicking() {
                self.wrapper.record(ERRORS_METRIC, self.context);
            } else {
                debug!("Invocation dropped before the handler completed");
            }
        }
        self.wrapper.listener.on_end();
        self.wrapper.cold_start.complete();
    }
}
