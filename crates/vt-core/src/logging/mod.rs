//! Structured logging foundation for vt-core.
//!
//! Dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSON lines for agent/daemon hosts
//!
//! All log output goes to stderr; stdout stays free for whatever payload the
//! host emits. Initialization is idempotent — embedding hosts may have
//! installed their own subscriber already, in which case ours backs off.

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::sync::OnceLock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install the global tracing subscriber.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init_logging(config: &LogConfig) {
    INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_env("VT_LOG")
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter_str()));

        match config.format {
            LogFormat::Human => {
                let layer = fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false);
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init();
            }
            LogFormat::Jsonl => {
                let layer = fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false);
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init();
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_a_no_op() {
        let config = LogConfig::default();
        init_logging(&config);
        init_logging(&config);
        tracing::debug!("still alive after double init");
    }
}
