//! Diagram model: clickable regions drawn over a static body silhouette.
//!
//! The drawing itself is an external asset. The core only reads region
//! metadata (id, category, structure, side) and asks for bounding-box centers.
//! The built-in front view ships as embedded JSON; custom diagrams use the
//! same shape.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dictionary::{Category, Dictionary};
use crate::error::{BodyMapError, BodyMapResult};
use crate::geometry::{PathData, Point};
use crate::normalize::normalize;
use crate::resolver::Side;

const FRONT_ASSET: &str = include_str!("../assets/front.json");

/// Non-interactive silhouette stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilhouettePath {
    /// Style class, e.g. `silhouette` or `outline`.
    pub class: String,
    pub d: String,
}

/// Region row as it appears in a diagram asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub id: String,
    pub category: Category,
    pub structure: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub d: String,
}

/// Serialized diagram asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramAsset {
    pub name: String,
    #[serde(rename = "viewBox")]
    pub view_box: String,
    #[serde(default)]
    pub silhouette: Vec<SilhouettePath>,
    pub regions: Vec<RegionSpec>,
}

/// A clickable region with parsed geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: String,
    pub category: Category,
    pub structure: String,
    pub side: Option<Side>,
    /// Raw path data, kept for rendering.
    pub d: String,
    path: PathData,
}

impl Region {
    pub fn path(&self) -> &PathData {
        &self.path
    }
}

/// What the controller needs from a drawing.
///
/// Region order is significant: every lookup that can match several
/// regions returns the first one in this order.
pub trait DiagramModel {
    fn regions(&self) -> &[Region];

    fn region_by_id(&self, id: &str) -> Option<&Region> {
        self.regions().iter().find(|r| r.id == id)
    }

    /// Center of the region's geometric bounding box.
    fn bounding_center(&self, id: &str) -> Option<Point> {
        self.region_by_id(id).map(|r| r.path.center())
    }

    /// Region for a structure, preferring the requested side.
    ///
    /// Falls back to the first region of the structure when no region has the
    /// requested side, or when no side is given.
    fn resolve_region(&self, structure: &str, side: Option<Side>) -> Option<&Region> {
        let mut candidates = self.regions().iter().filter(|r| r.structure == structure);
        if let Some(side) = side {
            if let Some(hit) = candidates.clone().find(|r| r.side == Some(side)) {
                return Some(hit);
            }
        }
        candidates.next()
    }

    /// First region whose id, structure key or structure label contains the
    /// normalized query. Blank queries never match.
    fn search(&self, query: &str, dictionary: &Dictionary) -> Option<&Region> {
        let q = normalize(query);
        if q.is_empty() {
            return None;
        }
        self.regions().iter().find(|r| {
            normalize(&r.id).contains(&q)
                || normalize(&r.structure).contains(&q)
                || dictionary
                    .get(&r.structure)
                    .is_some_and(|e| normalize(&e.label).contains(&q))
        })
    }
}

/// A validated diagram.
#[derive(Debug, Clone)]
pub struct Diagram {
    pub name: String,
    pub view_box: String,
    pub silhouette: Vec<SilhouettePath>,
    regions: Vec<Region>,
}

impl Diagram {
    /// The embedded front view.
    pub fn front(dictionary: &Dictionary) -> BodyMapResult<Self> {
        Self::from_json(FRONT_ASSET, dictionary)
    }

    /// Load a diagram asset from disk.
    pub fn load(path: impl AsRef<Path>, dictionary: &Dictionary) -> BodyMapResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let diagram = Self::from_json(&json, dictionary)?;
        debug!(path = %path.display(), regions = diagram.regions.len(), "Loaded diagram");
        Ok(diagram)
    }

    pub fn from_json(json: &str, dictionary: &Dictionary) -> BodyMapResult<Self> {
        let asset: DiagramAsset = serde_json::from_str(json)?;
        Self::from_asset(asset, dictionary)
    }

    /// Validate an asset: unique ids, known structures, parseable paths.
    pub fn from_asset(asset: DiagramAsset, dictionary: &Dictionary) -> BodyMapResult<Self> {
        let mut seen = HashSet::new();
        let mut regions = Vec::with_capacity(asset.regions.len());

        for spec in asset.regions {
            if !seen.insert(spec.id.clone()) {
                return Err(BodyMapError::DuplicateRegion { id: spec.id });
            }
            if dictionary.get(&spec.structure).is_none() {
                return Err(BodyMapError::UnknownStructure {
                    region: spec.id,
                    structure: spec.structure,
                });
            }
            let path = PathData::parse(&spec.d)
                .map_err(|message| BodyMapError::invalid_path(&spec.id, message))?;
            regions.push(Region {
                id: spec.id,
                category: spec.category,
                structure: spec.structure,
                side: spec.side,
                d: spec.d,
                path,
            });
        }

        for outline in &asset.silhouette {
            PathData::parse(&outline.d)
                .map_err(|message| BodyMapError::invalid_path(&outline.class, message))?;
        }

        Ok(Self {
            name: asset.name,
            view_box: asset.view_box,
            silhouette: asset.silhouette,
            regions,
        })
    }
}

impl DiagramModel for Diagram {
    fn regions(&self) -> &[Region] {
        &self.regions
    }
}
