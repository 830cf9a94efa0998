// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Datadog instrumentation for AWS Lambda handlers written in Rust.
//!
//! Wrapping a handler invocation:
//! - extracts the Datadog trace headers (`x-datadog-trace-id`,
//!   `x-datadog-parent-id`, `x-datadog-sampling-priority`) from the event and
//!   exposes them through [`trace_context`];
//! - records the `invocations` and `errors` enhanced metrics, tagged with the
//!   function name, region, account, memory size, cold start and runtime;
//! - returns the handler's result unchanged.
//!
//! Metrics are written to standard output as JSON lines for the Datadog log
//! forwarder. Custom metrics go through [`metric`].
//!
//! ```no_run
//! use serde_json::{json, Value};
//! use datadog_lambda::LambdaContext;
//!
//! fn handle(event: &Value, context: &LambdaContext) -> Result<Value, datadog_lambda::Error> {
//!     datadog_lambda::wrap(event, context, || {
//!         let trace = datadog_lambda::trace_context();
//!         datadog_lambda::metric("orders.placed", 1, None, [("shop", "eu")])?;
//!         Ok(json!({ "traced": trace.is_some() }))
//!     })
//! }
//! ```
//!
//! With the `lambda-runtime` feature, `lambda_runtime::Context` can be passed
//! as the invocation context directly.
//!
//! The process-wide functions use a wrapper created on first use, configured
//! from the environment (see [`Config::from_env`]). Embedders wanting explicit ownership construct their
//! own [`LambdaWrapper`].

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod config;
pub mod context;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod trace;
pub mod wrapper;

use std::fmt::Display;
use std::future::Future;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde_json::Value;

pub use config::Config;
pub use context::{InvocationContext, LambdaContext};
pub use error::Error;
pub use metrics::{MetricEmitter, MetricValue};
pub use trace::TraceContext;
pub use wrapper::LambdaWrapper;

static WRAPPER: OnceLock<LambdaWrapper> = OnceLock::new();

/// The process-wide wrapper, created on first use.
pub fn wrapper() -> &'static LambdaWrapper {
    WRAPPER.get_or_init(|| LambdaWrapper::new(Config::from_env()))
}

/// Runs `handler` as one instrumented invocation of the process-wide wrapper.
///
/// See [`LambdaWrapper::wrap`].
pub fn wrap<C, T, E, F>(event: &Value, context: &C, handler: F) -> Result<T, E>
where
    C: InvocationContext + ?Sized,
    F: FnOnce() -> Result<T, E>,
    E: From<Error>,
{
    wrapper().wrap(event, context, handler)
}

/// Async counterpart of [`wrap`].
pub async fn wrap_async<C, T, E, F, Fut>(event: &Value, context: &C, handler: F) -> Result<T, E>
where
    C: InvocationContext + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<Error>,
{
    wrapper().wrap_async(event, context, handler).await
}

/// Trace context of the current (or most recent) invocation.
pub fn trace_context() -> Option<TraceContext> {
    wrapper().trace_context()
}

/// Emits a custom metric to standard output.
///
/// See [`MetricEmitter::metric`].
pub fn metric<I, K, V>(
    name: &str,
    value: impl Into<MetricValue>,
    time: Option<DateTime<Utc>>,
    tags: I,
) -> Result<(), Error>
where
    I: IntoIterator<Item = (K, V)>,
    K: Display,
    V: Display,
{
    wrapper().metric(name, value, time, tags)
}
