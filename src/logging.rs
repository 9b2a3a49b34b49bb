//! Structured logging setup
//!
//! `RUST_LOG` picks the filter, `LOG_FORMAT` picks `pretty` (default),
//! `compact` or `json` output.

use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::{
  fmt::{self, format::FmtSpan},
  layer::SubscriberExt,
  util::{SubscriberInitExt, TryInitError},
  EnvFilter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Json,
  Pretty,
  Compact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
  /// Filter directive (trace, debug, info, warn, error, or a full directive)
  pub level: String,
  pub format: LogFormat,
  /// Include source file and line numbers
  pub include_location: bool,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".into(),
      format: LogFormat::Pretty,
      include_location: false,
    }
  }
}

impl LoggingConfig {
  pub fn from_env() -> Self {
    let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

    let format = match env::var("LOG_FORMAT").as_deref() {
      Ok("json") => LogFormat::Json,
      Ok("compact") => LogFormat::Compact,
      _ => LogFormat::Pretty,
    };

    Self {
      level,
      format,
      include_location: env::var("LOG_INCLUDE_LOCATION").is_ok(),
    }
  }

  fn filter(&self) -> EnvFilter {
    // sqlx logs every statement at info; keep it quiet unless asked
    EnvFilter::new(&self.level).add_directive(
      "sqlx::query=warn"
        .parse()
        .unwrap_or_else(|_| tracing::Level::WARN.into()),
    )
  }

  /// Install the global subscriber.
  ///
  /// Errors if a subscriber is already installed, so callers that may
  /// run twice (tests, app re-entry) can ignore the result.
  pub fn init(&self) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(self.filter());

    match self.format {
      LogFormat::Json => {
        let layer = fmt::layer()
          .with_file(self.include_location)
          .with_line_number(self.include_location)
          .with_target(true)
          .with_writer(io::stdout)
          .with_span_events(FmtSpan::NONE)
          .json();
        registry.with(layer).try_init()?;
      }
      LogFormat::Pretty => {
        let layer = fmt::layer()
          .with_file(self.include_location)
          .with_line_number(self.include_location)
          .with_target(true)
          .with_writer(io::stdout);
        registry.with(layer).try_init()?;
      }
      LogFormat::Compact => {
        let layer = fmt::layer()
          .compact()
          .with_target(false)
          .with_writer(io::stdout);
        registry.with(layer).try_init()?;
      }
    }

    info!(
      service.version = env!("CARGO_PKG_VERSION"),
      log.level = %self.level,
      log.format = ?self.format,
      "Race planner logging initialized"
    );
    Ok(())
  }
}

/// Initialize logging from the environment
pub fn init_from_env() -> Result<(), TryInitError> {
  LoggingConfig::from_env().init()
}
