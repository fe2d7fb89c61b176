//! Annotation list and region table.

use std::io::Write;

use anyhow::{Context, Result};
use bodymap_core::{
    empty_list_message, AnnotationPersistence, Controller, Diagram, DiagramModel, ListRow,
};

use super::open_controller;
use crate::config::Config;

/// Print the annotations of a session, newest first.
pub fn execute(config: &Config, session: Option<u8>, json: bool) -> Result<()> {
    let controller = open_controller(config, session)?;
    let rows = controller.rows();

    if json {
        let out = serde_json::to_string_pretty(&rows)
            .with_context(|| "Failed to serialize annotation list")?;
        println!("{out}");
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    write_rows(&controller, &rows, &mut stdout)?;
    Ok(())
}

/// Human-readable list, or the empty-session placeholder.
pub fn write_rows<P: AnnotationPersistence>(
    controller: &Controller<Diagram, P>,
    rows: &[ListRow],
    out: &mut impl Write,
) -> std::io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "{}", empty_list_message(controller.state().view.session));
    }
    for row in rows {
        writeln!(out, "{row}")?;
    }
    Ok(())
}

/// Print every clickable region with its pin position.
pub fn regions(config: &Config) -> Result<()> {
    let controller = open_controller(config, None)?;
    let diagram = controller.diagram();

    println!(
        "{:<22} {:<8} {:<12} {:<7} {}",
        "ID", "LAYER", "STRUCTURE", "SIDE", "CENTER"
    );
    println!("{:-<62}", "");
    for region in diagram.regions() {
        let center = diagram
            .bounding_center(&region.id)
            .map(|p| p.rounded())
            .map(|p| format!("{},{}", p.x, p.y))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<22} {:<8} {:<12} {:<7} {}",
            region.id,
            region.category.as_str(),
            region.structure,
            region.side.map(|s| s.as_str()).unwrap_or("-"),
            center
        );
    }
    Ok(())
}
