// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The process-wide wrapper keeps its state for the life of the process, so the
//! whole lifecycle is exercised in a single test.

mod common;

use datadog_lambda::Error;
use serde_json::json;

use common::{lambda_context, traced_event};

#[test]
fn test_process_wide_lifecycle() {
    let context = lambda_context();

    // Read once, when the wrapper is first used. The unknown log level must
    // not reset the other settings.
    std::env::set_var("DD_LOG_LEVEL", "warning");
    std::env::set_var("DD_ENHANCED_METRICS", "false");
    assert!(!datadog_lambda::wrapper().config().enhanced_metrics);
    assert_eq!(datadog_lambda::wrapper().config().log_level, "info");

    assert!(datadog_lambda::wrapper().is_cold_start());
    assert_eq!(datadog_lambda::trace_context(), None);

    // A failing first invocation still ends the cold start
    let failed: Result<(), Error> = datadog_lambda::wrap(&traced_event(), &context, || {
        Err(Error::Validation("handler failed".to_string()))
    });
    assert!(matches!(failed, Err(Error::Validation(ref m)) if m == "handler failed"));
    assert!(!datadog_lambda::wrapper().is_cold_start());

    let trace = datadog_lambda::trace_context().unwrap();
    assert_eq!(trace.trace_id, "12345");
    assert_eq!(trace.parent_id, "45678");
    assert_eq!(trace.sample_mode, 2);
    assert_eq!(datadog_lambda::trace_context(), Some(trace));

    let value: Result<u32, Error> = datadog_lambda::wrap(&json!({}), &context, || {
        datadog_lambda::metric("orders.placed", 1, None, [("shop", "eu")])?;
        Ok(100)
    });
    assert_eq!(value.unwrap(), 100);
    assert_eq!(datadog_lambda::trace_context(), None);

    assert!(std::ptr::eq(
        datadog_lambda::wrapper(),
        datadog_lambda::wrapper()
    ));
}
