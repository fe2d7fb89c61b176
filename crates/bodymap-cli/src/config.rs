//! CLI configuration management.
//!
//! Values come from environment variables, then the config file, then
//! defaults. A `.env` file in the working directory is loaded first.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bodymap_core::{Intensity, Session};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Application-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the annotation store file.
    pub data_dir: PathBuf,

    /// Custom diagram JSON. The built-in front view is used when unset.
    pub diagram_path: Option<PathBuf>,

    /// Session selected on startup (1..6).
    pub default_session: u8,

    /// Live intensity on startup (1..10).
    pub default_intensity: u8,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("bodymap"));

        Self {
            data_dir,
            diagram_path: None,
            default_session: Session::default().value(),
            default_intensity: Intensity::default().value(),
        }
    }
}

impl Config {
    /// Load configuration from the config file and environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = Self::load_file()?;

        // Environment takes precedence over the file
        if let Ok(data_dir) = std::env::var("BODYMAP_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(diagram) = std::env::var("BODYMAP_DIAGRAM") {
            config.diagram_path = Some(PathBuf::from(diagram));
        }
        if let Ok(session) = std::env::var("BODYMAP_SESSION") {
            config.default_session = session.parse().unwrap_or(config.default_session);
        }
        if let Ok(intensity) = std::env::var("BODYMAP_INTENSITY") {
            config.default_intensity = intensity.parse().unwrap_or(config.default_intensity);
        }

        config.default_session = Session::clamped(config.default_session.into()).value();
        config.default_intensity = Intensity::clamped(config.default_intensity.into()).value();

        Ok(config)
    }

    /// Load the config file alone, without environment overrides.
    ///
    /// Falls back to defaults when there is no file.
    pub fn load_file() -> Result<Self> {
        match Self::config_file_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config from {}", path.display()))?;
                serde_json::from_str(&contents).with_context(|| "Failed to parse config file")
            }
            _ => Ok(Self::default()),
        }
    }

    /// Save current configuration to the config file.
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_file_path() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&config_path, contents)
                .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        }
        Ok(())
    }

    /// Get the path to the config file. `BODYMAP_CONFIG` overrides the
    /// platform location.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("BODYMAP_CONFIG") {
            return Some(PathBuf::from(path));
        }
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "bodymap", "bodymap")
}
