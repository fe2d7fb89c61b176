//! Config command implementation.
//!
//! Manages CLI configuration.

use std::path::PathBuf;

use anyhow::Result;
use bodymap_core::{Intensity, JsonFileStore, Session};

use crate::config::Config;

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("Body Map CLI Configuration");
    println!("{:-<40}", "");

    println!("Data Directory:      {}", config.data_dir.display());
    println!(
        "Annotation Store:    {}",
        JsonFileStore::new(&config.data_dir).path().display()
    );
    println!(
        "Diagram:             {}",
        config
            .diagram_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(built-in front view)".to_string())
    );
    println!("Default Session:     {}", config.default_session);
    println!("Default Intensity:   {}/10", config.default_intensity);

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data-dir" => {
            config.data_dir = PathBuf::from(value);
            println!("Set data-dir to: {}", value);
        }
        "diagram" | "diagram-path" => {
            config.diagram_path = match value {
                "" | "builtin" | "front" => None,
                path => Some(PathBuf::from(path)),
            };
            println!("Set diagram to: {}", value);
        }
        "session" | "default-session" => {
            config.default_session = Session::clamped(value.parse()?).value();
            println!("Set default-session to: {}", config.default_session);
        }
        "intensity" | "default-intensity" => {
            config.default_intensity = Intensity::clamped(value.parse()?).value();
            println!("Set default-intensity to: {}", config.default_intensity);
        }
        _ => {
            anyhow::bail!(
                "Unknown config key: {}. Valid keys: data-dir, diagram, session, intensity",
                key
            );
        }
    }

    config.save()?;
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    let value = match key {
        "data-dir" => config.data_dir.display().to_string(),
        "diagram" | "diagram-path" => config
            .diagram_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
        "session" | "default-session" => config.default_session.to_string(),
        "intensity" | "default-intensity" => config.default_intensity.to_string(),
        _ => {
            anyhow::bail!("Unknown config key: {}", key);
        }
    };

    println!("{}", value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    Ok(())
}
