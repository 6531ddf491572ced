//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::settings::{LogFormat, LoggingSettings};

/// Builds the level filter: `RUST_LOG` when set, else the configured level.
#[must_use]
pub fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level))
}

/// Installs the global tracing subscriber.
///
/// Does nothing if a subscriber is already installed.
pub fn init_telemetry(settings: &LoggingSettings) {
    let layer = match settings.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter(settings))
        .with(layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            version = env!("CARGO_PKG_VERSION"),
            level = %settings.level,
            format = ?settings.format,
            "telemetry initialized"
        );
    }
}
