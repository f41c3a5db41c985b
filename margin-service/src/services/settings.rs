//! Configuration for margin-service.

use crate::error::AppError;
use config::{Config as Cfg, File};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Runtime settings.
///
/// `overhead_percent` is the global fallback used when no category rule
/// matches. A non-numeric value in the environment is a load-time error,
/// never a silent default.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_overhead_percent")]
    pub overhead_percent: Decimal,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_overhead_percent() -> Decimal {
    Decimal::new(5, 0)
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load settings from an optional `configuration` file and
    /// `MARGIN_`-prefixed environment variables.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(
                config::Environment::with_prefix("MARGIN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            overhead_percent: default_overhead_percent(),
            log_level: default_log_level(),
        }
    }
}
