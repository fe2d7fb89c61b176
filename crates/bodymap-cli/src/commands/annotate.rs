//! One-shot annotation commands: voice, select, find, delete.
//!
//! Each command loads the store, performs one selection, optionally edits
//! and saves the note, and exits.

use anyhow::Result;
use tracing::info;

use super::{open_controller, report, AppController};
use crate::config::Config;

/// Options shared by the selecting commands.
#[derive(Debug, Clone, Default)]
pub struct AnnotateOptions {
    pub session: Option<u8>,
    pub intensity: Option<u8>,
    pub note: Option<String>,
    pub save: bool,
}

/// Resolve a free-text command and select the named region.
pub fn voice(config: &Config, text: &str, options: &AnnotateOptions) -> Result<()> {
    let mut controller = open_controller(config, options.session)?;
    let status = controller.run_voice(text);
    report(&status)?;
    finish(&mut controller, options)
}

/// Select a region by id.
pub fn select(config: &Config, id: &str, options: &AnnotateOptions) -> Result<()> {
    let mut controller = open_controller(config, options.session)?;
    let status = controller.select_region(id);
    report(&status)?;
    finish(&mut controller, options)
}

/// Select the first region matching a search query.
pub fn find(config: &Config, query: &str, options: &AnnotateOptions) -> Result<()> {
    let mut controller = open_controller(config, options.session)?;
    let status = controller.find(query);
    report(&status)?;
    finish(&mut controller, options)
}

/// Delete the annotation of a region in a session.
pub fn delete(config: &Config, id: &str, session: Option<u8>) -> Result<()> {
    let mut controller = open_controller(config, session)?;
    report(&controller.select_region(id))?;
    let status = controller.delete_selection();
    info!(region = id, status = ?status, "Delete finished");
    report(&status)
}

/// Apply note and intensity overrides, then save if requested.
fn finish(controller: &mut AppController, options: &AnnotateOptions) -> Result<()> {
    if let Some(intensity) = options.intensity {
        controller.set_intensity(intensity.into());
    }
    if let Some(note) = &options.note {
        controller.set_note(note.as_str());
    }

    if options.save {
        return report(&controller.save_note());
    }

    let note = controller.state().note.trim();
    if !note.is_empty() {
        println!("Notiz: {note}");
    }
    Ok(())
}
