//! Region geometry: points, bounding boxes and path bounds.
//!
//! Path data is handed to `usvg` inside a one-element document; the tight
//! object bounding box it reports includes curve extrema, the same box a
//! browser returns from `getBBox()`.

use serde::{Deserialize, Serialize};

/// A 2D point in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates to whole diagram units.
    pub fn rounded(self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

impl From<usvg::Rect> for BoundingBox {
    fn from(rect: usvg::Rect) -> Self {
        Self {
            x: f64::from(rect.x()),
            y: f64::from(rect.y()),
            width: f64::from(rect.width()),
            height: f64::from(rect.height()),
        }
    }
}

/// Validated path data with its geometric bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathData {
    bounds: BoundingBox,
}

impl PathData {
    /// Parse an SVG `d` attribute.
    ///
    /// Fails when the data cannot be embedded in an attribute, or when nothing
    /// drawable is left after parsing.
    pub fn parse(d: &str) -> Result<Self, String> {
        if let Some(c) = d.chars().find(|c| matches!(c, '"' | '<' | '&')) {
            return Err(format!("unexpected character '{c}'"));
        }

        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"><path d="{d}"/></svg>"#
        );
        let tree = usvg::Tree::from_str(&svg, &usvg::Options::default())
            .map_err(|err| format!("failed to parse path: {err}"))?;

        tree.root()
            .children()
            .iter()
            .find_map(|node| match node {
                usvg::Node::Path(path) => Some(Self {
                    bounds: path.bounding_box().into(),
                }),
                _ => None,
            })
            .ok_or_else(|| "path has no drawable segments".to_string())
    }

    /// Tight geometric bounds of the path.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point {
        self.bounds.center()
    }
}
