//! Render the body map as SVG or as a JSON projection.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use askama::Template;
use bodymap_core::projection::{PIN_DOT_RADIUS, PIN_RING_RADIUS};
use bodymap_core::{
    AnnotationPersistence, Controller, Diagram, DiagramModel, Isolation, Layer, ListRow, Point,
    Projection, Session,
};
use serde::Serialize;
use tracing::info;

use super::open_controller;
use crate::config::Config;

/// Output format for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!("Unknown format: {}. Use 'svg' or 'json'", s),
        }
    }
}

/// View adjustments applied before rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub session: Option<u8>,
    pub select: Option<String>,
    pub intensity: Option<u8>,
    pub isolate: Option<Isolation>,
    pub hide: Vec<Layer>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Render the configured diagram with the given view adjustments.
pub fn execute(config: &Config, options: &RenderOptions) -> Result<()> {
    let mut controller = open_controller(config, options.session)?;

    if let Some(isolation) = options.isolate {
        controller.set_isolation(isolation);
    }
    for layer in &options.hide {
        controller.set_layer(*layer, false);
    }
    if let Some(id) = &options.select {
        let status = controller.select_region(id);
        if status.is_failure() {
            anyhow::bail!("{status}");
        }
    }
    if let Some(intensity) = options.intensity {
        controller.set_intensity(intensity.into());
    }

    let content = render(&controller, options.format)?;
    match &options.output {
        Some(path) => write_output(path, &content),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

/// Render the controller's current state.
pub fn render<P: AnnotationPersistence>(
    controller: &Controller<Diagram, P>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Svg => render_svg(controller),
        OutputFormat::Json => render_json(controller),
    }
}

/// Write rendered content to a file, creating parent directories.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output to: {}", path.display()))?;

    println!("Output written to: {}", path.display());
    Ok(())
}

fn render_svg<P: AnnotationPersistence>(controller: &Controller<Diagram, P>) -> Result<String> {
    let diagram = controller.diagram();
    let projection = controller.projection();

    let layers = projection
        .layers
        .iter()
        .map(|visual| {
            let mut class = String::from("layer");
            if visual.dimmed {
                class.push_str(" dim");
            }

            let shapes = match visual.layer {
                Layer::Silhouette => diagram
                    .silhouette
                    .iter()
                    .map(|outline| SvgShape {
                        id: "",
                        class: outline.class.clone(),
                        d: &outline.d,
                        fill: String::new(),
                    })
                    .collect(),
                Layer::Markers => Vec::new(),
                layer => region_shapes(diagram, &projection, layer),
            };
            let pins = if visual.layer == Layer::Markers {
                projection.pins.clone()
            } else {
                Vec::new()
            };

            SvgLayer {
                name: visual.layer.as_str(),
                class,
                hidden: !visual.visible,
                shapes,
                pins,
            }
        })
        .collect();

    let template = BodyMapTemplate {
        view_box: &diagram.view_box,
        session: projection.session,
        layers,
        ring_radius: PIN_RING_RADIUS,
        dot_radius: PIN_DOT_RADIUS,
    };

    info!(
        diagram = %diagram.name,
        session = %projection.session,
        pins = projection.pins.len(),
        "Rendering SVG"
    );
    template
        .render()
        .with_context(|| "Failed to render SVG template")
}

fn region_shapes<'a>(
    diagram: &'a Diagram,
    projection: &Projection,
    layer: Layer,
) -> Vec<SvgShape<'a>> {
    diagram
        .regions()
        .iter()
        .filter(|region| region.category.layer() == layer)
        .map(|region| {
            let visual = projection.region(&region.id);
            let mut class = format!("region {}", region.category);
            if visual.is_some_and(|v| v.active) {
                class.push_str(" active");
            }
            if visual.is_some_and(|v| v.related) {
                class.push_str(" related");
            }
            SvgShape {
                id: &region.id,
                class,
                d: &region.d,
                fill: visual
                    .and_then(|v| v.fill)
                    .map(|fill| fill.to_string())
                    .unwrap_or_default(),
            }
        })
        .collect()
}

fn render_json<P: AnnotationPersistence>(controller: &Controller<Diagram, P>) -> Result<String> {
    let snapshot = RenderSnapshot {
        view_box: &controller.diagram().view_box,
        projection: controller.projection(),
        rows: controller.rows(),
    };
    serde_json::to_string_pretty(&snapshot).with_context(|| "Failed to serialize projection to JSON")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderSnapshot<'a> {
    view_box: &'a str,
    projection: Projection,
    rows: Vec<ListRow>,
}

/// Askama template for SVG output.
#[derive(Template)]
#[template(path = "bodymap.svg")]
struct BodyMapTemplate<'a> {
    view_box: &'a str,
    session: Session,
    layers: Vec<SvgLayer<'a>>,
    ring_radius: f64,
    dot_radius: f64,
}

struct SvgLayer<'a> {
    name: &'static str,
    class: String,
    hidden: bool,
    shapes: Vec<SvgShape<'a>>,
    pins: Vec<Point>,
}

struct SvgShape<'a> {
    /// Empty for non-clickable outlines.
    id: &'a str,
    class: String,
    d: &'a str,
    /// Inline fill, empty when the stylesheet default applies.
    fill: String,
}
