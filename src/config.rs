//! Application configuration.
//!
//! Read once at startup from the environment (after loading an optional
//! `.env`). Nothing here changes while the app runs.

use std::path::PathBuf;

use crate::data::schema::DEFAULT_REASON_PREFIX;
use crate::error::ConfigError;

/// Survey extract to load.
pub const DATA_PATH_VAR: &str = "PULSE_DATA_PATH";
/// Column prefix of the reason indicators.
pub const REASON_PREFIX_VAR: &str = "PULSE_REASON_PREFIX";
/// Initial window size as `WIDTHxHEIGHT`.
pub const WINDOW_SIZE_VAR: &str = "PULSE_WINDOW_SIZE";

pub const DEFAULT_DATA_PATH: &str = "pulse39.csv";
pub const DEFAULT_WINDOW_SIZE: [f32; 2] = [1280.0, 860.0];

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub reason_prefix: String,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            reason_prefix: DEFAULT_REASON_PREFIX.to_string(),
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Unset variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = lookup(DATA_PATH_VAR) {
            if path.trim().is_empty() {
                return Err(ConfigError::Empty(DATA_PATH_VAR));
            }
            config.data_path = PathBuf::from(path.trim());
        }
        if let Some(prefix) = lookup(REASON_PREFIX_VAR) {
            if prefix.is_empty() {
                return Err(ConfigError::Empty(REASON_PREFIX_VAR));
            }
            config.reason_prefix = prefix;
        }
        if let Some(size) = lookup(WINDOW_SIZE_VAR) {
            config.window_size = parse_window_size(&size).ok_or(ConfigError::Invalid {
                name: WINDOW_SIZE_VAR,
                value: size,
            })?;
        }
        Ok(config)
    }
}

fn parse_window_size(s: &str) -> Option<[f32; 2]> {
    let (w, h) = s.trim().split_once(['x', 'X'])?;
    let w: f32 = w.trim().parse().ok()?;
    let h: f32 = h.trim().parse().ok()?;
    (w > 0.0 && h > 0.0).then_some([w, h])
}
