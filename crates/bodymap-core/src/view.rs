//! Transient view state: layer toggles, isolation mode, sliders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::annotation::{Intensity, Session};

/// Drawing layer groups, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Silhouette,
    Bones,
    Muscles,
    Nerves,
    Markers,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::Silhouette,
        Layer::Bones,
        Layer::Muscles,
        Layer::Nerves,
        Layer::Markers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Silhouette => "silhouette",
            Layer::Bones => "bones",
            Layer::Muscles => "muscles",
            Layer::Nerves => "nerves",
            Layer::Markers => "markers",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silhouette" | "sil" => Ok(Layer::Silhouette),
            "bones" | "bone" => Ok(Layer::Bones),
            "muscles" | "muscle" => Ok(Layer::Muscles),
            "nerves" | "nerve" => Ok(Layer::Nerves),
            "markers" | "marker" | "pins" => Ok(Layer::Markers),
            _ => Err(format!(
                "Unknown layer: {s}. Use silhouette, bones, muscles, nerves or markers"
            )),
        }
    }
}

/// Which layer, if any, stays undimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Isolation {
    /// All layers at full strength.
    #[default]
    Mix,
    /// Every layer except this one is dimmed.
    Only(Layer),
}

impl Isolation {
    /// Whether `layer` is dimmed under this mode.
    pub fn dims(&self, layer: Layer) -> bool {
        match self {
            Isolation::Mix => false,
            Isolation::Only(kept) => *kept != layer,
        }
    }
}

impl fmt::Display for Isolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Isolation::Mix => f.write_str("mix"),
            Isolation::Only(layer) => layer.fmt(f),
        }
    }
}

impl FromStr for Isolation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("mix") {
            return Ok(Isolation::Mix);
        }
        s.parse::<Layer>()
            .map(Isolation::Only)
            .map_err(|_| format!("Unknown isolation mode: {s}. Use mix or a layer name"))
    }
}

/// Per-layer visibility flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerFlags {
    pub silhouette: bool,
    pub bones: bool,
    pub muscles: bool,
    pub nerves: bool,
    pub markers: bool,
}

impl Default for LayerFlags {
    fn default() -> Self {
        Self {
            silhouette: true,
            bones: true,
            muscles: true,
            nerves: false,
            markers: true,
        }
    }
}

impl LayerFlags {
    pub fn get(&self, layer: Layer) -> bool {
        match layer {
            Layer::Silhouette => self.silhouette,
            Layer::Bones => self.bones,
            Layer::Muscles => self.muscles,
            Layer::Nerves => self.nerves,
            Layer::Markers => self.markers,
        }
    }

    pub fn set(&mut self, layer: Layer, on: bool) {
        let flag = match layer {
            Layer::Silhouette => &mut self.silhouette,
            Layer::Bones => &mut self.bones,
            Layer::Muscles => &mut self.muscles,
            Layer::Nerves => &mut self.nerves,
            Layer::Markers => &mut self.markers,
        };
        *flag = on;
    }
}

/// Everything the user can adjust that is not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub layers: LayerFlags,
    pub isolation: Isolation,
    /// Live intensity slider.
    pub intensity: Intensity,
    pub session: Session,
}

impl ViewState {
    /// Restore layer flags, isolation and intensity. The session is kept.
    pub fn reset(&mut self) {
        *self = Self {
            session: self.session,
            ..Self::default()
        };
    }
}
