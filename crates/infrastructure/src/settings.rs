//! Layered client settings.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. an optional `projecthub.{toml,yaml,json}` file in the working directory
//! 3. environment variables prefixed with `PROJECTHUB_`, nested keys joined
//!    with `__` (e.g. `PROJECTHUB_API__BASE_URL`)

use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use projecthub_application::StoreOptions;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const FILE_NAME: &str = "projecthub";
const ENV_PREFIX: &str = "PROJECTHUB";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Settings loading errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or did not match the expected shape.
    #[error("failed to load settings: {0}")]
    Load(#[from] ConfigError),

    /// The API base URL is not an absolute http(s) URL.
    #[error("invalid api.base_url {url:?}: {reason}")]
    InvalidBaseUrl {
        /// Configured value.
        url: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A value is out of range.
    #[error("invalid setting {key}: {reason}")]
    Invalid {
        /// Dotted key of the setting.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Where and how to reach the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// Base URL the endpoint paths are resolved against.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl ApiSettings {
    /// Parses and checks the base URL.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBaseUrl` unless the value is an absolute http(s) URL.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let invalid = |reason: String| SettingsError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        Ok(url)
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Paging and search tuning.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CollectionSettings {
    /// Records requested per page.
    pub page_size: u32,
    /// Minimum trimmed query length that triggers a search.
    pub search_min_chars: usize,
    /// Quiet period before typed input is searched.
    pub search_debounce_ms: u64,
}

impl CollectionSettings {
    /// Options for the collection store.
    #[must_use]
    pub const fn store_options(&self) -> StoreOptions {
        StoreOptions {
            page_size: self.page_size,
            search_min_chars: self.search_min_chars,
        }
    }

    /// Quiet period before typed input is searched.
    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human friendly.
    Pretty,
    /// One line per event.
    Compact,
    /// JSON objects, one per line.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default level filter; `RUST_LOG` takes precedence.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

/// All client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSettings {
    /// API connection.
    pub api: ApiSettings,
    /// Collection store tuning.
    pub collections: CollectionSettings,
    /// Logging.
    pub logging: LoggingSettings,
}

impl ClientSettings {
    /// Loads settings from defaults, the optional settings file and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed, `api.base_url` is
    /// missing, or a value fails validation.
    pub fn load() -> Result<Self, SettingsError> {
        let builder = Self::defaults()?
            .add_source(File::with_name(FILE_NAME).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::build(builder)
    }

    /// Loads settings from defaults and an in-memory document.
    ///
    /// # Errors
    ///
    /// As [`ClientSettings::load`].
    pub fn from_document(contents: &str, format: FileFormat) -> Result<Self, SettingsError> {
        Self::build(Self::defaults()?.add_source(File::from_str(contents, format)))
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api.timeout_ms", 30_000_i64)?
            .set_default(
                "api.user_agent",
                concat!("projecthub/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("collections.page_size", 20_i64)?
            .set_default("collections.search_min_chars", 2_i64)?
            .set_default("collections.search_debounce_ms", 300_i64)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        self.api.base_url()?;

        if self.api.timeout_ms == 0 {
            return Err(SettingsError::Invalid {
                key: "api.timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.collections.page_size == 0 {
            return Err(SettingsError::Invalid {
                key: "collections.page_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(SettingsError::Invalid {
                key: "logging.level",
                reason: format!(
                    "{} is not one of {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_fill_everything_but_base_url() {
        let settings = ClientSettings::from_document(
            r#"
            [api]
            base_url = "http://localhost:8000"
            "#,
            FileFormat::Toml,
        )
        .unwrap();

        assert_eq!(settings.api.timeout(), Duration::from_secs(30));
        assert!(settings.api.user_agent.starts_with("projecthub/"));
        assert_eq!(
            settings.collections.store_options(),
            StoreOptions {
                page_size: 20,
                search_min_chars: 2
            }
        );
        assert_eq!(
            settings.collections.search_debounce(),
            Duration::from_millis(300)
        );
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let settings = ClientSettings::from_document(
            r#"
            [api]
            base_url = "https://hub.example.com/"
            timeout_ms = 5000

            [collections]
            page_size = 50

            [logging]
            format = "json"
            "#,
            FileFormat::Toml,
        )
        .unwrap();

        assert_eq!(settings.api.timeout_ms, 5000);
        assert_eq!(settings.collections.page_size, 50);
        assert_eq!(settings.collections.search_min_chars, 2);
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_missing_base_url_is_an_error() {
        let result = ClientSettings::from_document("", FileFormat::Toml);
        assert!(matches!(result, Err(SettingsError::Load(_))));
    }

    #[test]
    fn test_non_http_base_url_is_rejected() {
        let result = ClientSettings::from_document(
            r#"
            [api]
            base_url = "ftp://files.example.com"
            "#,
            FileFormat::Toml,
        );
        assert!(matches!(result, Err(SettingsError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let result = ClientSettings::from_document(
            r#"
            [api]
            base_url = "http://localhost:8000"

            [logging]
            level = "loud"
            "#,
            FileFormat::Toml,
        );
        assert!(matches!(
            result,
            Err(SettingsError::Invalid {
                key: "logging.level",
                ..
            })
        ));
    }
}
