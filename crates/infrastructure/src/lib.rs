//! `ProjectHub` Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings loading and
//! logging setup for binaries.

pub mod adapters;
pub mod settings;
pub mod telemetry;

pub use adapters::ReqwestHttpClient;
pub use settings::{
    ApiSettings, ClientSettings, CollectionSettings, LogFormat, LoggingSettings, SettingsError,
};
pub use telemetry::init_telemetry;
