//! Configuration loading for SentryVault.

pub mod settings;

pub use settings::Settings;
