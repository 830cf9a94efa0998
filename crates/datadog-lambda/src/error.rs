// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors raised by the Lambda instrumentation itself.
///
/// Errors returned by the wrapped handler never pass through this type; they are
/// handed back to the caller untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A metric was submitted with an invalid name or value.
    #[error("Invalid metric: {0}")]
    Validation(String),

    /// A trace header carried a value that could not be decoded.
    #[error("Cannot extract from `{header}`, failed to decode {value:?}")]
    Parse { header: &'static str, value: String },

    /// Writing a metric line to the output sink failed.
    #[error("Failed to write metric: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize metric: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
