// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Distributed trace context for Lambda invocations.
//!
//! Each invocation starts by extracting the Datadog trace headers from the
//! inbound event and installing them as the active [`TraceContext`]:
//!
//! ```text
//! Inbound Event
//!   ↓
//! extractor::extract (headers → TraceContext | absent)
//!   ↓
//! Listener::on_start (install into TraceContextStore)
//!   ↓
//! Handler runs, reads the context through trace_context()
//!   ↓
//! Listener::on_end
//! ```

pub mod carrier;
pub mod context;
pub mod extractor;
pub mod listener;

pub use context::{TraceContext, TraceContextStore};
pub use listener::Listener;

/// Header key for the Datadog trace ID.
///
/// Example: `x-datadog-trace-id: 1234567890`
pub const DATADOG_TRACE_ID_KEY: &str = "x-datadog-trace-id";

/// Header key for the Datadog parent span ID.
///
/// Example: `x-datadog-parent-id: 9876543210`
pub const DATADOG_PARENT_ID_KEY: &str = "x-datadog-parent-id";

/// Header key for the Datadog sampling priority.
///
/// Values: -1 (user reject), 0 (auto reject), 1 (auto keep), 2 (user keep)
pub const DATADOG_SAMPLING_PRIORITY_KEY: &str = "x-datadog-sampling-priority";
