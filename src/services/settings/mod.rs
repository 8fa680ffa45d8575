//! Engine settings stored as a TOML file.

mod service;

pub use service::{default_settings_path, SettingsService};
