//! Handles settings for the application. Configuration is written in
//! `settings.toml`.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level filter, e.g. `info` or `debug`.
    pub level: String,
    /// Reporting timezone civil days are expanded in, e.g. `Asia/Bangkok`.
    /// Defaults to UTC when absent.
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Database {
    /// sea-orm connection string, e.g. `sqlite:./cashbook.db?mode=rwc`.
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
