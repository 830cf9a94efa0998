// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Custom and enhanced metrics.
//!
//! - **emitter**: the stdout line protocol consumed by the Datadog log forwarder
//! - **enhanced**: `invocations` / `errors` metrics tagged with function identity
//!   and cold start state

pub mod emitter;
pub mod enhanced;

pub use emitter::{MetricEmitter, MetricValue, LIBRARY_TAG};
pub use enhanced::{ColdStart, EnhancedTags, ERRORS_METRIC, INVOCATIONS_METRIC};
