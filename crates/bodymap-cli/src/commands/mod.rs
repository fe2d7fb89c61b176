//! CLI command implementations.

pub mod annotate;
pub mod config;
pub mod list;
pub mod render;
pub mod repl;

use anyhow::{Context, Result};
use bodymap_core::{Controller, Diagram, Dictionary, JsonFileStore, Status};
use tracing::debug;

use crate::config::Config;

/// Controller over the configured diagram and the on-disk annotation store.
pub type AppController = Controller<Diagram, JsonFileStore>;

/// Build a controller from configuration, starting in `session` when given.
pub fn open_controller(config: &Config, session: Option<u8>) -> Result<AppController> {
    let dictionary = Dictionary::builtin();
    let diagram = match &config.diagram_path {
        Some(path) => Diagram::load(path, dictionary)
            .with_context(|| format!("Failed to load diagram from {}", path.display()))?,
        None => Diagram::front(dictionary).with_context(|| "Failed to load built-in diagram")?,
    };

    let store = JsonFileStore::new(&config.data_dir);
    debug!(
        diagram = %diagram.name,
        store = %store.path().display(),
        "Opening body map"
    );

    let mut controller = Controller::new(diagram, store);
    controller.set_session(session.unwrap_or(config.default_session).into());
    controller.set_intensity(config.default_intensity.into());
    Ok(controller)
}

/// Print a status, turning failures into an error so the process exits non-zero.
pub fn report(status: &Status) -> Result<()> {
    if status.is_failure() {
        anyhow::bail!("{status}");
    }
    println!("{status}");
    Ok(())
}
