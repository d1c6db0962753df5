//! Application-level configuration loading: team profile defaults and the
//! selectable team color set.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "FUTSAL_BOARD_BACK_CONFIG_PATH";
/// Team name used until the profile is saved for the first time.
const DEFAULT_TEAM_NAME: &str = "My Team";
/// Opponent name used when setup is confirmed with a blank field.
const DEFAULT_OPPONENT_NAME: &str = "United FC";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    team_name: String,
    opponent_name: String,
    team_colors: Vec<String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        colors = app_config.team_colors.len(),
                        "loaded team defaults from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Team name to use until a profile has been saved.
    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    /// Opponent name used when setup leaves the field blank.
    pub fn opponent_name(&self) -> &str {
        &self.opponent_name
    }

    /// Selectable team colors, first entry being the default.
    pub fn team_colors(&self) -> &[String] {
        &self.team_colors
    }

    /// Default color assigned to a fresh team profile.
    pub fn default_color(&self) -> &str {
        self.team_colors
            .first()
            .map(String::as_str)
            .unwrap_or("#3b82f6")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            team_name: DEFAULT_TEAM_NAME.to_owned(),
            opponent_name: DEFAULT_OPPONENT_NAME.to_owned(),
            team_colors: default_colors(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    team_name: Option<String>,
    #[serde(default)]
    opponent_name: Option<String>,
    #[serde(default)]
    team_colors: Vec<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            team_name: value.team_name.unwrap_or(defaults.team_name),
            opponent_name: value.opponent_name.unwrap_or(defaults.opponent_name),
            team_colors: if value.team_colors.is_empty() {
                defaults.team_colors
            } else {
                value.team_colors
            },
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in color set shipped with the binary.
fn default_colors() -> Vec<String> {
    [
        "#3b82f6", "#ef4444", "#22c55e", "#eab308", "#8b5cf6", "#ec4899", "#06b6d4", "#f97316",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}
