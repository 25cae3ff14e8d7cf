//! Log formatting shared by the server binary.

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::{Compact, Format, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Crate targets that get their own level directive.
pub const TARGET_PREFIXES: [&str; 5] = ["ai_llm_service", "rag_base", "chat_store", "contextor", "api"];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Compact single-line event format with the chrono timer, target and `file:line`.
fn event_format() -> Format<Compact, ChronoRfc3339Utc> {
    fmt::format()
        .compact()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_source_location(true)
}

/// Build the formatting layer used by the server.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with target and `file:line`
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    layer_with_writer(io::stdout, io::stdout().is_terminal())
}

/// Same format as [`layer`], writing to `writer`.
pub fn layer_with_writer<S, W>(writer: W, ansi: bool) -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .event_format(event_format())
        .with_ansi(ansi)
        .with_writer(writer)
}

/// Level directive for one crate target, e.g. `rag_base=debug`.
pub fn level_directive(target: &str, level: Level) -> Option<Directive> {
    let s = format!("{target}={}", level.as_str().to_lowercase());
    Directive::from_str(&s).ok()
}

/// Create an EnvFilter from `RUST_LOG` or `default`, then raise this
/// workspace's crates to `level`.
///
/// With `RUST_LOG` set, the env value wins and no directives are added.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => TARGET_PREFIXES
            .iter()
            .filter_map(|t| level_directive(t, level))
            .fold(EnvFilter::new(default), |f, d| f.add_directive(d)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn log_lines_start_with_whole_second_rfc3339() {
        let buf = SharedBuf::default();
        let sink = buf.clone();
        let subscriber = tracing_subscriber::registry()
            .with(layer_with_writer(move || sink.clone(), false));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(session_id = "s1", "chat answered");
        });

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let stamp = out.split_whitespace().next().unwrap();
        assert_eq!(stamp.len(), "2025-09-12T10:20:30Z".len(), "{out}");
        assert!(stamp.ends_with('Z'));
        assert!(!stamp.contains('.'));
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
        assert!(out.contains("INFO"));
        assert!(out.contains("chat answered"));
    }

    #[test]
    fn directive_uses_lowercase_level() {
        let d = level_directive("contextor", Level::DEBUG).unwrap();
        assert_eq!(d.to_string(), "contextor=debug");
    }
}
