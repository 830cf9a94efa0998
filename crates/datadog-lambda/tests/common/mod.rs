// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use datadog_lambda::{Config, LambdaContext, LambdaWrapper, MetricEmitter};
use serde_json::{json, Value};

/// Metric sink shared between the emitter and the test.
#[derive(Clone, Default)]
pub struct Output(Arc<Mutex<Vec<u8>>>);

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Output {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn records(&self) -> Vec<Value> {
        self.text()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

pub fn wrapper() -> (LambdaWrapper, Output) {
    let output = Output::default();
    let wrapper = LambdaWrapper::with_emitter(
        Config::default(),
        MetricEmitter::with_writer(output.clone()),
    );
    (wrapper, output)
}

pub fn lambda_context() -> LambdaContext {
    LambdaContext {
        invoked_function_arn: "arn:aws:lambda:us-east-1:123456789012:function:my-function"
            .to_string(),
        function_name: "my-function".to_string(),
        memory_limit_in_mb: 1024,
    }
}

pub fn traced_event() -> Value {
    json!({
        "resource": "/orders",
        "httpMethod": "POST",
        "headers": {
            "x-datadog-trace-id": "12345",
            "x-datadog-parent-id": "45678",
            "x-datadog-sampling-priority": "2"
        },
        "body": "{}"
    })
}

pub fn cold_start_tag(record: &Value) -> Option<&str> {
    record["t"]
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .find(|tag| tag.starts_with("cold_start:"))
}
