use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;
use feed_client::{
    fetcher::{DEFAULT_ENDPOINT, DEFAULT_MIN_MAGNITUDE},
    FeedQuery,
};
use serde::{Deserialize, Serialize};
use shared::{domain::OrderBy, error::ParseOrderByError};
use thiserror::Error;
use tracing::warn;
use url::Url;

pub const SETTINGS_FILE_ENV: &str = "QUAKES_SETTINGS_FILE";

const MIN_MAGNITUDE_ENV: [&str; 2] = ["QUAKES_MIN_MAGNITUDE", "APP__MIN_MAGNITUDE"];
const ORDER_BY_ENV: [&str; 2] = ["QUAKES_ORDER_BY", "APP__ORDER_BY"];
const ENDPOINT_ENV: [&str; 2] = ["QUAKES_ENDPOINT", "APP__ENDPOINT"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("minimum magnitude '{0}' is not a number")]
    InvalidMagnitude(String),
    #[error(transparent)]
    UnknownOrderBy(#[from] ParseOrderByError),
    #[error("endpoint '{value}' is not a valid URL: {source}")]
    InvalidEndpoint {
        value: String,
        source: url::ParseError,
    },
}

/// User-facing settings, read fresh at every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub min_magnitude: String,
    pub order_by: OrderBy,
    pub endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_magnitude: DEFAULT_MIN_MAGNITUDE.into(),
            order_by: OrderBy::default(),
            endpoint: DEFAULT_ENDPOINT.into(),
        }
    }
}

impl Settings {
    pub fn set_min_magnitude(&mut self, raw: &str) -> Result<(), SettingsError> {
        let raw = raw.trim();
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                self.min_magnitude = raw.to_string();
                Ok(())
            }
            _ => Err(SettingsError::InvalidMagnitude(raw.to_string())),
        }
    }

    pub fn set_order_by(&mut self, raw: &str) -> Result<(), SettingsError> {
        self.order_by = raw.parse()?;
        Ok(())
    }

    pub fn set_endpoint(&mut self, raw: &str) -> Result<(), SettingsError> {
        let raw = raw.trim();
        Url::parse(raw).map_err(|source| SettingsError::InvalidEndpoint {
            value: raw.to_string(),
            source,
        })?;
        self.endpoint = raw.to_string();
        Ok(())
    }

    pub fn feed_query(&self) -> FeedQuery {
        FeedQuery::new(&self.endpoint, &self.min_magnitude, self.order_by)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_magnitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
}

pub fn settings_path() -> Option<PathBuf> {
    if let Ok(v) = std::env::var(SETTINGS_FILE_ENV) {
        if !v.trim().is_empty() {
            return Some(PathBuf::from(v));
        }
    }
    dirs::config_dir().map(|dir| dir.join("quakes").join("settings.toml"))
}

/// Defaults, then the settings file, then environment overrides.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();
    if let Some(path) = settings_path() {
        apply_file(&mut settings, &path);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn apply_file(settings: &mut Settings, path: &Path) {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable settings file");
            return;
        }
    };

    let file_cfg = match toml::from_str::<SettingsFile>(&raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring invalid settings file");
            return;
        }
    };

    let source = path.display().to_string();
    if let Some(v) = file_cfg.min_magnitude {
        apply_value(&source, settings.set_min_magnitude(&v));
    }
    if let Some(v) = file_cfg.order_by {
        apply_value(&source, settings.set_order_by(&v));
    }
    if let Some(v) = file_cfg.endpoint {
        apply_value(&source, settings.set_endpoint(&v));
    }
}

pub fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    for key in MIN_MAGNITUDE_ENV {
        if let Some(v) = lookup(key) {
            apply_value(key, settings.set_min_magnitude(&v));
        }
    }
    for key in ORDER_BY_ENV {
        if let Some(v) = lookup(key) {
            apply_value(key, settings.set_order_by(&v));
        }
    }
    for key in ENDPOINT_ENV {
        if let Some(v) = lookup(key) {
            apply_value(key, settings.set_endpoint(&v));
        }
    }
}

fn apply_value(source: &str, result: Result<(), SettingsError>) {
    if let Err(err) = result {
        warn!(%source, error = %err, "ignoring invalid setting");
    }
}

pub fn save_settings(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create settings directory '{}'",
                parent.display()
            )
        })?;
    }

    let file_cfg = SettingsFile {
        min_magnitude: Some(settings.min_magnitude.clone()),
        order_by: Some(settings.order_by.to_string()),
        endpoint: (settings.endpoint != DEFAULT_ENDPOINT).then(|| settings.endpoint.clone()),
    };
    let raw = toml::to_string_pretty(&file_cfg).context("failed to encode settings")?;
    fs::write(path, raw)
        .with_context(|| format!("failed to write settings file '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
