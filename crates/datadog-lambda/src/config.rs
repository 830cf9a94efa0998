// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::Error;
use std::env;
use tracing::warn;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration for the Lambda instrumentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Diagnostic log level, one of trace, debug, info, warn or error
    pub log_level: String,
    /// Whether `invocations` and `errors` enhanced metrics are recorded
    pub enhanced_metrics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            enhanced_metrics: true,
        }
    }
}

fn is_log_level(level: &str) -> bool {
    LOG_LEVELS.contains(&level)
}

impl Config {
    /// Reads `DD_LOG_LEVEL` and `DD_ENHANCED_METRICS`.
    ///
    /// Each variable is read on its own. An unknown log level is reported and
    /// replaced by `info` without affecting the other settings.
    #[must_use]
    pub fn from_env() -> Self {
        let log_level = env::var("DD_LOG_LEVEL")
            .ok()
            .map(|val| val.trim().to_lowercase())
            .and_then(|level| {
                if is_log_level(&level) {
                    Some(level)
                } else {
                    warn!("Ignoring DD_LOG_LEVEL {level:?}, logging at {DEFAULT_LOG_LEVEL}");
                    None
                }
            })
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let enhanced_metrics = env::var("DD_ENHANCED_METRICS")
            .map(|val| !val.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        Self {
            log_level,
            enhanced_metrics,
        }
    }

    /// Checks settings built by hand rather than read from the environment.
    pub fn validate(&self) -> Result<(), Error> {
        if is_log_level(&self.log_level) {
            return Ok(());
        }
        Err(Error::InvalidConfig(format!(
            "DD_LOG_LEVEL {:?} is not one of {}",
            self.log_level,
            LOG_LEVELS.join(", ")
        )))
    }
}
