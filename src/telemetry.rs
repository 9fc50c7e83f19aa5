//! Tracing subscriber setup for binaries and tests embedding the crate.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: filter directives (default: `version_snapshot=info`)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "version_snapshot=info";

/// Output format of log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human readable, for local development.
    Pretty,
}

impl LogFormat {
    /// Read the format from `LOG_FORMAT`.
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    /// Parse a format name; anything but "pretty" is JSON.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("pretty") {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn try_init_tracing(format: LogFormat) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_span_events(FmtSpan::CLOSE))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true),
            )
            .try_init(),
    }
}

/// Install the global subscriber, ignoring an already installed one.
pub fn init_tracing(format: LogFormat) {
    let _ = try_init_tracing(format);
}
