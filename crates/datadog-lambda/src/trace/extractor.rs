// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Extraction of Datadog trace headers from inbound invocation events.
//!
//! ```text
//! x-datadog-trace-id: 12345
//! x-datadog-parent-id: 45678
//! x-datadog-sampling-priority: 2
//! ```
//!
//! All three headers must be present to produce a [`TraceContext`]. A missing
//! header yields no context, while a sampling priority that is present but not an
//! integer is reported as [`Error::Parse`].

use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::trace::carrier::Extractor;
use crate::trace::context::TraceContext;
use crate::trace::{DATADOG_PARENT_ID_KEY, DATADOG_SAMPLING_PRIORITY_KEY, DATADOG_TRACE_ID_KEY};

const HEADERS_KEY: &str = "headers";

/// Extracts the trace context from an invocation event.
///
/// The event is searched for a `headers` object (key matched ignoring case), as
/// sent by API Gateway, ALB and function URL integrations.
///
/// ```
/// use serde_json::json;
/// use datadog_lambda::trace::extractor::extract;
///
/// let event = json!({
///     "headers": {
///         "X-Datadog-Trace-Id": "12345",
///         "X-Datadog-Parent-Id": "45678",
///         "X-Datadog-Sampling-Priority": "2"
///     }
/// });
///
/// let context = extract(&event).unwrap().unwrap();
/// assert_eq!(context.trace_id, "12345");
/// assert_eq!(context.sample_mode, 2);
/// ```
pub fn extract(event: &Value) -> Result<Option<TraceContext>, Error> {
    match headers(event) {
        Some(headers) => extract_from(headers),
        None => {
            debug!("No headers found in event, skipping trace extraction");
            Ok(None)
        }
    }
}

/// Extracts the trace context from any header carrier.
pub fn extract_from(carrier: &dyn Extractor) -> Result<Option<TraceContext>, Error> {
    let (Some(trace_id), Some(parent_id), Some(sampling_priority)) = (
        carrier.get(DATADOG_TRACE_ID_KEY),
        carrier.get(DATADOG_PARENT_ID_KEY),
        carrier.get(DATADOG_SAMPLING_PRIORITY_KEY),
    ) else {
        debug!("Incomplete Datadog trace headers, no trace context extracted");
        return Ok(None);
    };

    let sample_mode = sampling_priority
        .trim()
        .parse::<i8>()
        .map_err(|_| Error::Parse {
            header: DATADOG_SAMPLING_PRIORITY_KEY,
            value: sampling_priority.to_string(),
        })?;

    Ok(Some(TraceContext {
        trace_id: trace_id.to_string(),
        parent_id: parent_id.to_string(),
        sample_mode,
    }))
}

/// Finds the headers object of an event, matching the key ignoring case.
#[must_use]
pub fn headers(event: &Value) -> Option<&Value> {
    let Value::Object(map) = event else {
        return None;
    };

    let headers = match map.get(HEADERS_KEY) {
        Some(headers) => Some(headers),
        None => map
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(HEADERS_KEY))
            .map(|(_, v)| v),
    };

    headers.filter(|h| h.is_object())
}
