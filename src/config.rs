use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub roi: RoiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiConfig {
    /// Values offered in the ROI type selector, in display order.
    #[serde(default = "default_roi_types")]
    pub types: Vec<String>,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,
    #[serde(default = "default_line_width")]
    pub line_width: u32,
}

// Default value functions
fn default_base_url() -> String {
    "http://127.0.0.1:8088".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_roi_types() -> Vec<String> {
    vec!["display".to_string()]
}

fn default_stroke_color() -> String {
    "#ff0000".to_string()
}

fn default_line_width() -> u32 {
    2
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            types: default_roi_types(),
            stroke_color: default_stroke_color(),
            line_width: default_line_width(),
        }
    }
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "roi-configurator")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration from `path`, or return defaults if it is missing or unreadable.
pub fn load_config_from(path: &Path) -> AppConfig {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return AppConfig::default();
    }
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to parse config file: {}. Using defaults.", e);
                AppConfig::default()
            }
        },
        Err(e) => {
            log::warn!("Failed to read config file: {}. Using defaults.", e);
            AppConfig::default()
        }
    }
}

/// Load configuration from the platform config directory.
pub fn load_config() -> AppConfig {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => AppConfig::default(),
    }
}

/// Save configuration to `path`, creating parent directories as needed.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let toml = toml::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(path, toml).map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}
