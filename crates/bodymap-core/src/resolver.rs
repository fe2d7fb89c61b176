//! Phrase resolver: structure, body side and pain intensity from free text.
//!
//! The three extractors are independent and total. Only a missing structure
//! makes a command unresolvable; side and intensity are optional modifiers.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::annotation::Intensity;
use crate::dictionary::{Dictionary, StructureEntry};
use crate::normalize::normalize;

/// Body side of a paired structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// German side word used in labels and status text.
    pub fn german(&self) -> &'static str {
        match self {
            Side::Left => "links",
            Side::Right => "rechts",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "l" | "links" => Ok(Side::Left),
            "right" | "r" | "rechts" => Ok(Side::Right),
            _ => Err(format!("Unknown side: {s}. Use 'left' or 'right'")),
        }
    }
}

/// Side tokens, checked in this order. The first side with a matching token wins,
/// so text naming both sides resolves to `Right`.
const SIDE_WORDS: [(Side, &[&str]); 2] = [
    (Side::Right, &["rechts", "right", "r"]),
    (Side::Left, &["links", "left", "l"]),
];

static SLASH_TEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9])\s*/\s*10").expect("valid intensity pattern"));
static VON_TEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9])\s*von\s*10").expect("valid intensity pattern"));
static LONE_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(10|[1-9])\b").expect("valid intensity pattern"));

/// Detect a body side by exact token membership.
pub fn detect_side(text: &str) -> Option<Side> {
    let normalized = normalize(text);
    let tokens: Vec<&str> = normalized.split(' ').collect();

    SIDE_WORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| tokens.contains(w)))
        .map(|(side, _)| *side)
}

/// Detect a pain score: `n/10`, then `n von 10`, then a standalone `1`..`10`.
pub fn detect_intensity(text: &str) -> Option<Intensity> {
    let normalized = normalize(text);

    [&*SLASH_TEN, &*VON_TEN, &*LONE_SCORE]
        .into_iter()
        .find_map(|re| re.captures(&normalized))
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .map(Intensity::clamped)
}

/// Outcome of resolving a free-text command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    pub structure: &'a StructureEntry,
    pub side: Option<Side>,
    pub intensity: Option<Intensity>,
}

/// Run all three extractors; `None` when no structure is named.
pub fn resolve<'a>(dictionary: &'a Dictionary, text: &str) -> Option<Resolution<'a>> {
    let structure = dictionary.find_structure(text)?;
    Some(Resolution {
        structure,
        side: detect_side(text),
        intensity: detect_intensity(text),
    })
}
