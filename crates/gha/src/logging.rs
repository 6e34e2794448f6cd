//! Log output for the gha CLI.
//!
//! Everything goes to stderr: `gha generate --stdout` must print workflow
//! text and nothing else on stdout.

use std::io;
use std::sync::OnceLock;
use tracing::Level;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};
use uuid::Uuid;

/// gha crates whose events are shown at the selected `--level`
const TARGETS: [&str; 4] = ["gha", "gha_core", "gha_github", "gha_dagger"];

/// How log lines are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TracingFormat {
    /// Multi-line, with span context and targets
    Pretty,
    /// One line per event
    #[default]
    Compact,
    /// Newline-delimited JSON, for CI log collectors
    Json,
}

/// `--level` values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Everything, including per-step compilation detail
    Trace,
    /// Generated filenames and container scripts
    Debug,
    /// Check progress
    Info,
    /// Shadowed env keys and empty manifests
    #[default]
    Warn,
    /// Failures only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// Subscriber settings taken from the command line
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Line format
    pub format: TracingFormat,
    /// Level applied to the gha crates when `RUST_LOG` is unset
    pub level: LogLevel,
    /// Filter directive taking precedence over both `level` and `RUST_LOG`
    pub filter: Option<String>,
}

impl TracingConfig {
    fn env_filter(&self) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
        match &self.filter {
            Some(directive) => EnvFilter::try_new(directive),
            None => EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_directive(self.level.into()))),
        }
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let fmt = tracing_subscriber::fmt::layer().with_writer(io::stderr);
        match self.format {
            TracingFormat::Pretty => fmt.pretty().boxed(),
            TracingFormat::Compact => fmt.compact().with_target(false).boxed(),
            TracingFormat::Json => fmt
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .boxed(),
        }
    }
}

static SESSION_ID: OnceLock<Uuid> = OnceLock::new();

/// Identifier attached to this invocation's first log event
pub fn correlation_id() -> Uuid {
    *SESSION_ID.get_or_init(Uuid::new_v4)
}

/// `EnvFilter` directive showing `level` for every gha crate and nothing else
#[must_use]
pub fn default_directive(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the filter directive does not parse.
pub fn init_tracing(config: TracingConfig) -> miette::Result<()> {
    let filter = config
        .env_filter()
        .map_err(|e| miette::miette!("invalid log filter: {e}"))?;

    tracing_subscriber::registry()
        .with(config.layer())
        .with(filter)
        .init();

    tracing::debug!(
        correlation_id = %correlation_id(),
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.format,
        "Logging ready"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_covers_all_crates() {
        assert_eq!(
            default_directive(Level::INFO),
            "gha=info,gha_core=info,gha_github=info,gha_dagger=info"
        );
    }

    #[test]
    fn test_default_level_is_warn() {
        assert_eq!(Level::from(LogLevel::default()), Level::WARN);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
    }

    #[test]
    fn test_explicit_filter_wins() {
        let config = TracingConfig {
            filter: Some("gha_github=trace".to_string()),
            ..TracingConfig::default()
        };
        assert!(config.env_filter().is_ok());

        let config = TracingConfig {
            filter: Some("gha=loud".to_string()),
            ..TracingConfig::default()
        };
        assert!(config.env_filter().is_err());
    }

    #[test]
    fn test_correlation_id_is_stable() {
        assert_eq!(correlation_id(), correlation_id());
    }
}
