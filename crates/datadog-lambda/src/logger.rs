// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Diagnostic logging for the Lambda instrumentation.
//!
//! Standard output carries the metric line protocol, so diagnostics are written
//! to standard error with a `DD_LAMBDA` prefix:
//!
//! ```text
//! DD_LAMBDA | DEBUG | invocation{function="my-fn"}: No trace context found in event
//! ```

use std::fmt;
use tracing::debug;
use tracing_core::{Event, Subscriber};
use tracing_subscriber::fmt::{
    format::{self, FormatEvent, FormatFields},
    FmtContext, FormattedFields,
};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Error;

/// Log formatter that prefixes every line with `DD_LAMBDA` and the level.
#[derive(Debug, Clone, Copy)]
pub struct Formatter;

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "DD_LAMBDA | {} | ", event.metadata().level())?;

        // Invocation spans, outermost first: `invocation{function=my-fn}: `
        for span in ctx.event_scope().into_iter().flat_map(|scope| scope.from_root()) {
            let extensions = span.extensions();
            match extensions
                .get::<FormattedFields<N>>()
                .filter(|fields| !fields.is_empty())
            {
                Some(fields) => write!(writer, "{}{{{fields}}}: ", span.name())?,
                None => write!(writer, "{}: ", span.name())?,
            }
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Installs the global subscriber for instrumentation diagnostics.
///
/// Calling this again after a subscriber is installed (by this crate or by the
/// host application) leaves the existing subscriber in place.
pub fn init(config: &Config) -> Result<(), Error> {
    config.validate()?;

    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| Error::InvalidConfig(format!("could not parse log level: {e}")))?;

    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .event_format(Formatter)
        .try_init();

    if let Err(e) = result {
        debug!("Keeping existing tracing subscriber: {e}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_formatter_prefixes_level_and_spans() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .event_format(Formatter)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("cold start");
            tracing::info_span!("invocation", function = "my-fn").in_scope(|| {
                tracing::warn!("metric dropped");
            });
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            output,
            "DD_LAMBDA | INFO | cold start\n\
             DD_LAMBDA | WARN | invocation{function=\"my-fn\"}: metric dropped\n"
        );
    }

    #[test]
    fn test_init_rejects_invalid_level() {
        let config = Config {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(matches!(init(&config), Err(Error::InvalidConfig(_))));
    }
}
