//! Derived visuals: layer states, region fills, pins and the annotation list.
//!
//! A projection is a pure function of the view state, the annotation store and
//! the selection. Nothing here is stored.

use std::fmt;

use serde::Serialize;

use crate::annotation::{Annotation, AnnotationStore, Intensity, Session};
use crate::controller::Selection;
use crate::diagram::DiagramModel;
use crate::dictionary::Category;
use crate::geometry::Point;
use crate::view::{Layer, ViewState};

/// Base color of intensity fills.
pub const FILL_RGB: (u8, u8, u8) = (230, 193, 90);

/// Pin glyph radii (outer ring, inner dot).
pub const PIN_RING_RADIUS: f64 = 18.0;
pub const PIN_DOT_RADIUS: f64 = 7.0;

/// An RGBA fill color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    /// Base color at the opacity of `intensity`.
    pub fn for_intensity(intensity: Intensity) -> Self {
        let (r, g, b) = FILL_RGB;
        Self {
            r,
            g,
            b,
            a: intensity.opacity(),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerVisual {
    pub layer: Layer,
    pub visible: bool,
    pub dimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionVisual {
    pub id: String,
    pub layer: Layer,
    pub active: bool,
    /// Has an annotation in the current session.
    pub related: bool,
    pub fill: Option<Rgba>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub session: Session,
    pub layers: Vec<LayerVisual>,
    pub regions: Vec<RegionVisual>,
    pub pins: Vec<Point>,
}

impl Projection {
    pub fn layer(&self, layer: Layer) -> Option<&LayerVisual> {
        self.layers.iter().find(|l| l.layer == layer)
    }

    pub fn region(&self, id: &str) -> Option<&RegionVisual> {
        self.regions.iter().find(|r| r.id == id)
    }
}

/// Compute the visual state of every layer and region.
pub fn project<D: DiagramModel + ?Sized>(
    diagram: &D,
    view: &ViewState,
    store: &AnnotationStore,
    selection: Option<&Selection>,
) -> Projection {
    let layers = Layer::ALL
        .iter()
        .map(|&layer| LayerVisual {
            layer,
            visible: view.layers.get(layer),
            dimmed: view.isolation.dims(layer),
        })
        .collect();

    let regions = diagram
        .regions()
        .iter()
        .map(|region| {
            let active = selection.is_some_and(|s| s.region_id == region.id);
            let mark = store.get(view.session, &region.id);
            let fill = if active {
                Some(Rgba::for_intensity(view.intensity))
            } else {
                mark.filter(|m| m.category == Category::Muscle)
                    .map(|m| Rgba::for_intensity(m.intensity))
            };
            RegionVisual {
                id: region.id.clone(),
                layer: region.category.layer(),
                active,
                related: mark.is_some(),
                fill,
            }
        })
        .collect();

    // Marks of regions missing from this diagram get no pin.
    let pins = store
        .for_session(view.session)
        .filter(|a| diagram.region_by_id(&a.region_id).is_some())
        .filter_map(|a| a.pin)
        .collect();

    Projection {
        session: view.session,
        layers,
        regions,
        pins,
    }
}

/// One entry of the annotation list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRow {
    pub region_id: String,
    pub label: String,
    pub category: Category,
    pub intensity: Intensity,
    pub note: String,
    pub updated_at: u64,
}

impl From<&Annotation> for ListRow {
    fn from(a: &Annotation) -> Self {
        Self {
            region_id: a.region_id.clone(),
            label: a.label.clone(),
            category: a.category,
            intensity: a.intensity,
            note: a.note.clone(),
            updated_at: a.updated_at,
        }
    }
}

impl fmt::Display for ListRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let note = if self.note.is_empty() { "—" } else { self.note.as_str() };
        write!(
            f,
            "{} [{}] {} • Intensität {}/10 • {}",
            self.label,
            self.region_id,
            self.category.as_str().to_uppercase(),
            self.intensity,
            note
        )
    }
}

/// Annotation list for a session, newest first.
pub fn list_rows(store: &AnnotationStore, session: Session) -> Vec<ListRow> {
    store.rows(session).into_iter().map(ListRow::from).collect()
}

/// Placeholder shown when a session has no annotations.
pub fn empty_list_message(session: Session) -> String {
    format!("Keine Markierungen in Session {session}.")
}
