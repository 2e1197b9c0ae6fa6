//! Renamer settings, stored per library root as JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const STATE_DIR: &str = ".ai-renamer";
const SETTINGS_FILE: &str = "settings.json";

/// Which label-detection service to call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    #[default]
    Google,
    OpenAi,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub provider: Provider,
    #[serde(default)]
    pub google_api_key: String,
    #[serde(default)]
    pub openai_api_key: String,
    /// Public URL prefix mapped onto relative paths (e.g. a CDN base).
    /// When unset, image URLs fall back to absolute filesystem paths.
    #[serde(default)]
    pub public_base_url: Option<String>,
    /// Images are downscaled so the longest side is at most this before
    /// being sent to a provider (reduces payload and inference time).
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,
}

fn default_max_image_dimension() -> u32 {
    1024
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            google_api_key: String::new(),
            openai_api_key: String::new(),
            public_base_url: None,
            max_image_dimension: default_max_image_dimension(),
        }
    }
}

fn settings_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join(SETTINGS_FILE)
}

/// Load settings for a library root. Missing file yields defaults.
pub fn load_settings(root: &Path) -> Settings {
    let path = settings_path(root);
    if !path.exists() {
        return Settings::default();
    }
    match fs::read_to_string(&path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => Settings::default(),
    }
}

/// Save settings for a library root (used by the host settings page).
pub fn save_settings(root: &Path, settings: &Settings) -> Result<(), String> {
    let path = settings_path(root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    let content = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
    fs::write(&path, content).map_err(|e| e.to_string())
}
