// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Line protocol for custom metrics.
//!
//! Every metric is written as one compact JSON line that the Datadog log
//! forwarder picks up from the function's output:
//!
//! ```text
//! {"e":1215508200000,"m":"m1","t":["dd_lambda_layer:datadog-rust","t.a:val"],"v":100}
//! ```
//!
//! - `e`: timestamp in epoch milliseconds, with whole-second precision
//! - `m`: metric name
//! - `t`: tags, library identity tag first, then caller tags in caller order
//! - `v`: metric value
//!
//! The forwarder matches on the key names and their order, so the record is
//! serialized from a struct with fields declared in exactly that order.

use std::fmt::{self, Display};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// Tag identifying this library on every emitted metric.
pub const LIBRARY_TAG: &str = "dd_lambda_layer:datadog-rust";

/// Numeric metric value, serialized as a bare JSON number.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl MetricValue {
    fn is_finite(self) -> bool {
        match self {
            Self::Float(v) => v.is_finite(),
            Self::Int(_) | Self::UInt(_) => true,
        }
    }
}

macro_rules! metric_value_from {
    ($variant:ident: $($t:ty),*) => {
        $(
            impl From<$t> for MetricValue {
                fn from(value: $t) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

metric_value_from!(Int: i8, i16, i32, i64);
metric_value_from!(UInt: u8, u16, u32, u64);
metric_value_from!(Float: f32, f64);

impl TryFrom<&Value> for MetricValue {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let Value::Number(number) = value else {
            return Err(Error::Validation("value must be a number".to_string()));
        };

        if let Some(v) = number.as_i64() {
            Ok(Self::Int(v))
        } else if let Some(v) = number.as_u64() {
            Ok(Self::UInt(v))
        } else {
            number
                .as_f64()
                .map(Self::Float)
                .ok_or_else(|| Error::Validation("value must be a number".to_string()))
        }
    }
}

impl Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Serialize)]
struct MetricRecord<'a> {
    e: i64,
    m: &'a str,
    t: Vec<String>,
    v: MetricValue,
}

/// Writes metric records to an output sink, standard output by default.
///
/// Each call produces exactly one line. Writes are attempted once; a failed
/// write is reported to the caller and not retried.
pub struct MetricEmitter {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl fmt::Debug for MetricEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricEmitter").finish_non_exhaustive()
    }
}

impl Default for MetricEmitter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl MetricEmitter {
    #[must_use]
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    #[must_use]
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Mutex::new(Box::new(writer)),
        }
    }

    /// Emits a metric.
    ///
    /// `time` defaults to now. Tags are written as `key:value` after the library
    /// tag, in the order `tags` yields them.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use datadog_lambda::MetricEmitter;
    ///
    /// let emitter = MetricEmitter::stdout();
    /// let time = Utc.with_ymd_and_hms(2008, 7, 8, 9, 10, 0).unwrap();
    /// emitter
    ///     .metric("m1", 100, Some(time), [("t.a", "val"), ("t.b", "v2")])
    ///     .unwrap();
    /// ```
    pub fn metric<I, K, V>(
        &self,
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
        let value = value.into();
        if !value.is_finite() {
            return Err(Error::Validation(format!("value must be finite, got {value}")));
        }

        let time = time.unwrap_or_else(Utc::now);
        let mut tag_list = vec![LIBRARY_TAG.to_string()];
        tag_list.extend(tags.into_iter().map(|(k, v)| format!("{k}:{v}")));

        let record = MetricRecord {
            e: epoch_millis(time),
            m: name,
            t: tag_list,
            v: value,
        };
        self.write_line(&serde_json::to_string(&record)?)
    }

    /// Emits a metric from loosely typed input, e.g. fields of a JSON payload.
    ///
    /// Fails with [`Error::Validation`] if `name` is not a string or `value` is
    /// not a number.
    pub fn metric_json<I, K, V>(
        &self,
        name: &Value,
        value: &Value,
        time: Option<DateTime<Utc>>,
        tags: I,
    ) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        let Value::String(name) = name else {
            return Err(Error::Validation("name must be a string".to_string()));
        };
        let value = MetricValue::try_from(value)?;
        self.metric(name, value, time, tags)
    }

    fn write_line(&self, line: &str) -> Result<(), Error> {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(sink, "{line}")?;
        sink.flush()?;
        Ok(())
    }
}

/// Whole seconds since the epoch (fraction truncated toward zero), in milliseconds.
fn epoch_millis(time: DateTime<Utc>) -> i64 {
    let mut secs = time.timestamp();
    if secs < 0 && time.timestamp_subsec_nanos() > 0 {
        secs += 1;
    }
    secs * 1000
}
