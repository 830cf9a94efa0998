// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Host-supplied description of the running invocation.
//!
//! The Lambda runtime owns the invocation context; the instrumentation only reads
//! the function identity and its memory limit from it through [`InvocationContext`].

use serde::{Deserialize, Serialize};

/// Read access to the fields of the runtime's invocation context used for tagging.
pub trait InvocationContext {
    /// Full ARN of the invoked function, e.g.
    /// `arn:aws:lambda:us-east-1:123456789012:function:my-function`.
    fn invoked_function_arn(&self) -> &str;

    fn function_name(&self) -> &str;

    fn memory_limit_in_mb(&self) -> u32;
}

impl<T: InvocationContext + ?Sized> InvocationContext for &T {
    fn invoked_function_arn(&self) -> &str {
        (**self).invoked_function_arn()
    }

    fn function_name(&self) -> &str {
        (**self).function_name()
    }

    fn memory_limit_in_mb(&self) -> u32 {
        (**self).memory_limit_in_mb()
    }
}

/// Plain invocation context, for hosts that hand over the context as data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LambdaContext {
    pub invoked_function_arn: String,
    pub function_name: String,
    pub memory_limit_in_mb: u32,
}

impl InvocationContext for LambdaContext {
    fn invoked_function_arn(&self) -> &str {
        &self.invoked_function_arn
    }

    fn function_name(&self) -> &str {
        &self.function_name
    }

    fn memory_limit_in_mb(&self) -> u32 {
        self.memory_limit_in_mb
    }
}

/// The invocation context handed to handlers by `lambda_runtime`.
#[cfg(feature = "lambda-runtime")]
impl InvocationContext for lambda_runtime::Context {
    fn invoked_function_arn(&self) -> &str {
        &self.invoked_function_arn
    }

    fn function_name(&self) -> &str {
        &self.env_config.function_name
    }

    fn memory_limit_in_mb(&self) -> u32 {
        u32::try_from(self.env_config.memory).unwrap_or_default()
    }
}

/// The colon-delimited parts of a function ARN:
/// `arn:partition:service:region:account-id:resource...`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arn<'a> {
    pub region: Option<&'a str>,
    pub account_id: Option<&'a str>,
}

impl<'a> Arn<'a> {
    #[must_use]
    pub fn parse(arn: &'a str) -> Self {
        let mut parts = arn.split(':').skip(3);
        Self {
            region: parts.next(),
            account_id: parts.next(),
        }
    }
}
