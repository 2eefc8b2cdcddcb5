//! Logging bootstrap for LangCountry.
//!
//! A single [`init`] call installs a `tracing-subscriber` registry with an
//! [`EnvFilter`], one stderr layer and an optional file layer, in pretty,
//! compact or JSON form. [`LogConfig::from_env`] reads the `LANGCOUNTRY_LOG_*`
//! variables.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Environment variable names read by [`LogConfig::from_env`].
pub mod vars {
    pub const LEVEL: &str = "LANGCOUNTRY_LOG_LEVEL";
    pub const FORMAT: &str = "LANGCOUNTRY_LOG_FORMAT";
    pub const FILE: &str = "LANGCOUNTRY_LOG_FILE";
    pub const SOURCE: &str = "LANGCOUNTRY_LOG_SOURCE";
    pub const SPANS: &str = "LANGCOUNTRY_LOG_SPANS";
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Log file path (if file logging enabled).
    pub file_path: Option<PathBuf>,
    /// Include source location.
    pub source_location: bool,
    /// Include span open/close events.
    pub span_events: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Filter directive for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        use tracing_subscriber::filter::LevelFilter;
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON structured format.
    Json,
}

impl LogFormat {
    /// Parse from string; anything unrecognized is pretty.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            file_path: None,
            source_location: false,
            span_events: false,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

impl LogConfig {
    /// Create config from environment variables.
    ///
    /// `LANGCOUNTRY_LOG_LEVEL` wins over `RUST_LOG` when both are set.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let level = std::env::var(vars::LEVEL).or_else(|_| std::env::var("RUST_LOG"));
        if let Some(level) = level.ok().as_deref().and_then(LogLevel::parse) {
            config.level = level;
        }

        if let Ok(format) = std::env::var(vars::FORMAT) {
            config.format = LogFormat::parse(&format);
        }

        if let Ok(file_path) = std::env::var(vars::FILE) {
            if !file_path.trim().is_empty() {
                config.file_path = Some(PathBuf::from(file_path));
            }
        }

        if let Ok(source) = std::env::var(vars::SOURCE) {
            config.source_location = parse_flag(&source);
        }

        if let Ok(spans) = std::env::var(vars::SPANS) {
            config.span_events = parse_flag(&spans);
        }

        config
    }

    /// Same config at a different level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn output_layer<W>(config: &LogConfig, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_span_events(config.span_events());

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Open a log file for appending, creating parent directories.
pub fn open_log_file(path: &Path) -> Result<File, LogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Initialize logging with the given configuration.
///
/// `RUST_LOG` directives take precedence over the configured level. Fails if
/// a global subscriber is already installed.
pub fn init(config: LogConfig) -> Result<(), LogError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let mut layers = vec![output_layer(&config, io::stderr, true)];
    if let Some(path) = &config.file_path {
        let file = open_log_file(path)?;
        layers.push(output_layer(&config, Mutex::new(file), false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LogError::InitError(e.to_string()))
}

/// Logging errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to initialize logging: {0}")]
    InitError(String),

    #[error("failed to open log file: {0}")]
    FileError(#[from] io::Error),
}

/// Convenience macros re-exported from tracing.
pub use tracing::{debug, error, info, trace, warn};

/// Spans and timers for locale operations.
pub mod spans;
