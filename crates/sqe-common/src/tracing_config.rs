//! Tracing setup for watching the query engine work.
//!
//! Every public query on a semantic model opens a `debug` span named after
//! the query (`symbol_info`, `lookup_symbols`, ...) carrying the node or
//! position it was asked about. Scope walks, member filtering, and
//! synthesized-symbol interning log at `trace` inside those spans.
//!
//! Configuration comes from the environment:
//!
//! - `SQE_LOG`: a filter. A bare level (`debug`, `trace`) applies to the
//!   engine crates only, with everything else at `warn`. Anything else is
//!   an `EnvFilter` directive list used as is. Falls back to `RUST_LOG`.
//! - `SQE_LOG_FORMAT`: `text` (default), `tree` (indented by query span via
//!   `tracing-tree`), or `json`.
//! - `SQE_LOG_SPANS`: `close` to report each query span when it ends, with
//!   its busy and idle time. Ignored by the tree format, which always shows
//!   span structure.
//!
//! ```bash
//! # Every lookup of one test binary, nested under its query span
//! SQE_LOG=sqe_semantic::lookup=trace SQE_LOG_FORMAT=tree cargo test -p sqe-semantic --test lookup_tests
//!
//! # Query timings as JSON
//! SQE_LOG=debug SQE_LOG_FORMAT=json SQE_LOG_SPANS=close cargo bench -p sqe-semantic
//! ```
//!
//! Nothing is installed unless `SQE_LOG` or `RUST_LOG` is set.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Crates whose targets a bare `SQE_LOG` level applies to.
pub const ENGINE_TARGETS: &[&str] = &["sqe_common", "sqe_syntax", "sqe_symbols", "sqe_bound", "sqe_semantic"];

const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    /// Indented by span, so each query's events sit under it.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name; unknown names fall back to [`LogFormat::Text`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Resolved tracing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// `EnvFilter` directives.
    pub directives: String,
    pub format: LogFormat,
    /// Report query spans as they close.
    pub span_timings: bool,
}

impl TracingConfig {
    /// Read the settings through `var`, or `None` when logging is off.
    ///
    /// Taking the lookup as a function keeps this testable without touching
    /// the process environment.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let directives = match var("SQE_LOG") {
            Some(value) => engine_directives(&value),
            None => var("RUST_LOG")?,
        };
        Some(Self {
            directives,
            format: LogFormat::parse(&var("SQE_LOG_FORMAT").unwrap_or_default()),
            span_timings: var("SQE_LOG_SPANS").is_some_and(|v| v.eq_ignore_ascii_case("close")),
        })
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_timings {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Install the global subscriber. Later calls are ignored, so every test
    /// of a binary may call this. Output goes to stderr.
    pub fn install(&self) {
        let filter = EnvFilter::builder().parse_lossy(&self.directives);
        let result = match self.format {
            LogFormat::Tree => {
                let tree_layer = tracing_tree::HierarchicalLayer::default()
                    .with_indent_amount(2)
                    .with_indent_lines(true)
                    .with_deferred_spans(true)
                    .with_targets(true)
                    .with_writer(std::io::stderr);
                Registry::default().with(filter).with(tree_layer).try_init()
            }
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_events(self.span_events())
                    .with_writer(std::io::stderr);
                Registry::default().with(filter).with(json_layer).try_init()
            }
            LogFormat::Text => {
                let text_layer = fmt::layer()
                    .with_span_events(self.span_events())
                    .with_writer(std::io::stderr);
                Registry::default().with(filter).with(text_layer).try_init()
            }
        };
        // A subscriber installed by an earlier call wins.
        let _ = result;
    }
}

/// Scope a bare level to the engine crates; pass directive lists through.
fn engine_directives(value: &str) -> String {
    let level = value.trim().to_lowercase();
    if !LEVELS.contains(&level.as_str()) {
        return value.to_string();
    }
    let mut directives = vec!["warn".to_string()];
    directives.extend(ENGINE_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

/// Install tracing from the environment, if it asks for any.
pub fn init_tracing() {
    if let Some(config) = TracingConfig::from_env() {
        config.install();
    }
}
