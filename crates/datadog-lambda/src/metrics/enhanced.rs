// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Enhanced metrics recorded automatically around each invocation.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::context::{Arn, InvocationContext};

/// Count of invocations.
pub const INVOCATIONS_METRIC: &str = "invocations";

/// Count of invocations whose handler failed.
pub const ERRORS_METRIC: &str = "errors";

/// Runtime identifier reported in the `runtime` tag, e.g. `Rust 1.82.0`.
pub const RUNTIME: &str = concat!("Rust ", env!("DD_LAMBDA_RUSTC_VERSION"));

/// Tracks whether the process has completed an invocation yet.
///
/// Starts cold and turns warm once the first invocation completes, whether its
/// handler succeeded or not.
#[derive(Debug)]
pub struct ColdStart {
    cold: AtomicBool,
}

impl Default for ColdStart {
    fn default() -> Self {
        Self {
            cold: AtomicBool::new(true),
        }
    }
}

impl ColdStart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_cold(&self) -> bool {
        self.cold.load(Ordering::SeqCst)
    }

    /// Marks the first invocation as completed. Idempotent.
    pub fn complete(&self) {
        if self.cold.swap(false, Ordering::SeqCst) {
            debug!("First invocation completed, subsequent invocations are warm");
        }
    }
}

/// Tags attached to every enhanced metric.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnhancedTags {
    pub function_name: String,
    pub region: String,
    pub account_id: String,
    pub memory_size: u32,
    pub cold_start: bool,
    pub runtime: &'static str,
}

impl EnhancedTags {
    /// Builds the tags from the invocation context. Region and account are read
    /// from the function ARN and left empty if the ARN is too short.
    pub fn new<C: InvocationContext + ?Sized>(context: &C, cold_start: bool) -> Self {
        let arn = Arn::parse(context.invoked_function_arn());
        if arn.account_id.is_none() {
            debug!(
                "Function ARN {:?} has no region or account id",
                context.invoked_function_arn()
            );
        }

        Self {
            function_name: context.function_name().to_string(),
            region: arn.region.unwrap_or_default().to_string(),
            account_id: arn.account_id.unwrap_or_default().to_string(),
            memory_size: context.memory_limit_in_mb(),
            cold_start,
            runtime: RUNTIME,
        }
    }

    /// Tags in wire order.
    #[must_use]
    pub fn to_tags(&self) -> Vec<(&'static str, String)> {
        vec![
            ("functionname", self.function_name.clone()),
            ("region", self.region.clone()),
            ("account_id", self.account_id.clone()),
            ("memorysize", self.memory_size.to_string()),
            ("cold_start", self.cold_start.to_string()),
            ("runtime", self.runtime.to_string()),
        ]
    }
}
