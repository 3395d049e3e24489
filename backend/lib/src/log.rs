//! Logging setup for the chain sync backend
//!
//! Either Bunyan JSON or human-readable text, chosen through [`LogFormat`].
//! In JSON mode the "log." field prefix emitted by the `tracing-log` bridge is
//! renamed to "backend_log." because log ingestion tools reserve the former.

use std::io::Write;

use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::LogFormat;
use crate::constants::server::SERVICE_NAME;

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "info,tower_http=debug";

struct PrefixReplacingWriter<W: Write> {
    inner: W,
}

impl<W: Write> Write for PrefixReplacingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match std::str::from_utf8(buf) {
            Ok(s) => {
                self.inner
                    .write_all(s.replace("\"log.", "\"backend_log.").as_bytes())?;
                Ok(buf.len())
            }
            Err(_) => self.inner.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

struct StdoutPrefixReplacing;

impl<'a> MakeWriter<'a> for StdoutPrefixReplacing {
    type Writer = PrefixReplacingWriter<std::io::Stdout>;

    fn make_writer(&'a self) -> Self::Writer {
        PrefixReplacingWriter {
            inner: std::io::stdout(),
        }
    }
}

/// Install the global tracing subscriber.
///
/// Must be called once, before any span is entered.
pub fn initialize_logging(log_format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match log_format.resolve() {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(
                    SERVICE_NAME.to_string(),
                    StdoutPrefixReplacing,
                ))
                .init();
        }
        // `resolve` never yields `Auto`
        LogFormat::Text | LogFormat::Auto => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_reserved_log_prefix() {
        let mut writer = PrefixReplacingWriter { inner: Vec::new() };
        let line = br#"{"msg":"synced","log.target":"chain_sync","log.line":42}"#;

        let written = writer.write(line).unwrap();

        assert_eq!(written, line.len());
        assert_eq!(
            String::from_utf8(writer.inner).unwrap(),
            r#"{"msg":"synced","backend_log.target":"chain_sync","backend_log.line":42}"#
        );
    }
}
