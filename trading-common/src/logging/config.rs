//! Logging configuration and initialization.

use std::env;

use tracing_subscriber::fmt::time::{ChronoLocal, ChronoUtc};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use super::json_layer::JsonLayer;

const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %z";
const UTC_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

type FilteredRegistry = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-field format (default for terminals)
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Parse format from string, falling back to `Pretty`
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// Timestamp format for log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    /// Local time with offset (default)
    #[default]
    Local,
    /// UTC time (ISO 8601)
    Utc,
    /// No timestamps
    None,
}

impl TimestampFormat {
    /// Parse format from string, falling back to `Local`
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "utc" => TimestampFormat::Utc,
            "none" | "off" => TimestampFormat::None,
            _ => TimestampFormat::Local,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Output format (pretty, compact, json)
    pub format: LogFormat,
    /// Timestamp format
    pub timestamps: TimestampFormat,
    /// Filter used when `RUST_LOG` is not set
    pub default_level: String,
    /// Include source file location
    pub include_location: bool,
    /// Include thread IDs
    pub include_thread_ids: bool,
    /// Include target (module path)
    pub include_target: bool,
    /// Application name for JSON logs
    pub app_name: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            timestamps: TimestampFormat::Local,
            default_level: "info".to_string(),
            include_location: false,
            include_thread_ids: false,
            include_target: true,
            app_name: None,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables
    ///
    /// Reads:
    /// - `LOG_FORMAT`: pretty, compact, or json
    /// - `LOG_TIMESTAMPS`: local, utc, or none
    /// - `LOG_LEVEL`: default filter (fallback if RUST_LOG not set)
    /// - `LOG_LOCATION`: true/false for file:line info
    /// - `LOG_THREAD_IDS`: true/false for thread IDs
    /// - `LOG_APP_NAME`: application name for JSON logs
    pub fn from_env() -> Self {
        Self {
            format: env::var("LOG_FORMAT")
                .map(|s| LogFormat::from_str(&s))
                .unwrap_or_default(),
            timestamps: env::var("LOG_TIMESTAMPS")
                .map(|s| TimestampFormat::from_str(&s))
                .unwrap_or_default(),
            default_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            include_location: env_flag("LOG_LOCATION", false),
            include_thread_ids: env_flag("LOG_THREAD_IDS", false),
            include_target: true,
            app_name: env::var("LOG_APP_NAME").ok(),
        }
    }

    /// Create config for JSON output (log aggregation)
    pub fn json() -> Self {
        Self {
            format: LogFormat::Json,
            timestamps: TimestampFormat::Utc,
            include_location: true,
            include_thread_ids: true,
            ..Default::default()
        }
    }

    /// Create config for compact output (batch jobs)
    pub fn compact() -> Self {
        Self {
            format: LogFormat::Compact,
            ..Default::default()
        }
    }

    /// Set the application name, unless one came from the environment
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        if self.app_name.is_none() {
            self.app_name = Some(name.into());
        }
        self
    }

    /// Set the default log level
    pub fn with_default_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = level.into();
        self
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|s| s == "true" || s == "1")
        .unwrap_or(default)
}

/// Initialize logging with the given configuration
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber is
/// already installed.
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.default_level)?,
    };

    let layer = match config.format {
        LogFormat::Json => json_layer(&config),
        LogFormat::Compact | LogFormat::Pretty => fmt_layer(&config),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init()?;

    Ok(())
}

fn json_layer(config: &LogConfig) -> BoxedLayer {
    JsonLayer::new(
        config.app_name.clone(),
        config.include_location,
        config.include_thread_ids,
        config.timestamps,
    )
    .boxed()
}

fn fmt_layer(config: &LogConfig) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.include_target)
        .with_thread_ids(config.include_thread_ids)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_ansi(atty::is(atty::Stream::Stderr));

    // compact() and the timer each change the layer's type, so box every arm
    match (config.format == LogFormat::Compact, config.timestamps) {
        (true, TimestampFormat::Local) => layer
            .compact()
            .with_timer(ChronoLocal::new(LOCAL_TIME_FORMAT.to_string()))
            .boxed(),
        (true, TimestampFormat::Utc) => layer
            .compact()
            .with_timer(ChronoUtc::new(UTC_TIME_FORMAT.to_string()))
            .boxed(),
        (true, TimestampFormat::None) => layer.compact().without_time().boxed(),
        (false, TimestampFormat::Local) => layer
            .with_timer(ChronoLocal::new(LOCAL_TIME_FORMAT.to_string()))
            .boxed(),
        (false, TimestampFormat::Utc) => layer
            .with_timer(ChronoUtc::new(UTC_TIME_FORMAT.to_string()))
            .boxed(),
        (false, TimestampFormat::None) => layer.without_time().boxed(),
    }
}
