//! Fixed anatomical dictionary and longest-synonym structure detection.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;
use crate::resolver::Side;
use crate::view::Layer;

/// Anatomical category of a structure or region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bone,
    Muscle,
    Nerve,
}

impl Category {
    /// Stable lowercase key, also used in persisted annotations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bone => "bone",
            Category::Muscle => "muscle",
            Category::Nerve => "nerve",
        }
    }

    /// Diagram layer that draws regions of this category.
    pub fn layer(&self) -> Layer {
        match self {
            Category::Bone => Layer::Bones,
            Category::Muscle => Layer::Muscles,
            Category::Nerve => Layer::Nerves,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dictionary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureEntry {
    /// Unique structure key (e.g. `brachialis`).
    pub key: String,
    pub category: Category,
    /// Display label.
    pub label: String,
    /// Phrases that name this structure, in priority order.
    pub synonyms: Vec<String>,
}

impl StructureEntry {
    pub fn new(key: &str, category: Category, label: &str, synonyms: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            category,
            label: label.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Immutable structure table with synonyms pre-normalized for matching.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: Vec<StructureEntry>,
    /// `normalized[i]` holds the normalized synonyms of `entries[i]`.
    normalized: Vec<Vec<String>>,
}

static BUILTIN: LazyLock<Dictionary> = LazyLock::new(|| {
    Dictionary::new(vec![
        // muscles
        StructureEntry::new(
            "brachialis",
            Category::Muscle,
            "Brachialis",
            &[
                "brachialis",
                "muskel brachialis",
                "musculus brachialis",
                "brachiaris",
                "brachiális",
            ],
        ),
        StructureEntry::new(
            "biceps",
            Category::Muscle,
            "Bizeps (Biceps brachii)",
            &["bizeps", "biceps", "biceps brachii", "bizepsmuskel"],
        ),
        StructureEntry::new(
            "trapezius",
            Category::Muscle,
            "Trapezius",
            &["trapez", "trapezius", "nackenmuskel"],
        ),
        StructureEntry::new(
            "quad",
            Category::Muscle,
            "Quadrizeps",
            &["quadrizeps", "quadriceps", "vorderer oberschenkel", "quad"],
        ),
        // bones
        StructureEntry::new(
            "humerus",
            Category::Bone,
            "Humerus",
            &["humerus", "oberarmknochen"],
        ),
        StructureEntry::new(
            "femur",
            Category::Bone,
            "Femur",
            &["femur", "oberschenkelknochen"],
        ),
        StructureEntry::new(
            "spine",
            Category::Bone,
            "Wirbelsäule",
            &["wirbelsaeule", "wirbelsäule", "spine", "wirbel"],
        ),
        // nerves
        StructureEntry::new(
            "radial",
            Category::Nerve,
            "N. radialis",
            &["radialis", "n radialis", "nerv radialis", "radial nerve"],
        ),
        StructureEntry::new(
            "sciatic",
            Category::Nerve,
            "N. ischiadicus",
            &["ischias", "ischiadicus", "sciatic", "sciatic nerve"],
        ),
    ])
});

impl Dictionary {
    /// Build a dictionary, normalizing every synonym once.
    pub fn new(entries: Vec<StructureEntry>) -> Self {
        let normalized = entries
            .iter()
            .map(|entry| entry.synonyms.iter().map(|s| normalize(s)).collect())
            .collect();
        Self {
            entries,
            normalized,
        }
    }

    /// The built-in German anatomy table.
    pub fn builtin() -> &'static Dictionary {
        &BUILTIN
    }

    pub fn entries(&self) -> &[StructureEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&StructureEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Display label for a key, or the key itself when it is not in the table.
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(|e| e.label.as_str()).unwrap_or(key)
    }

    /// Label decorated with the German side word, e.g. `Brachialis (rechts)`.
    pub fn pretty_label(&self, key: &str, side: Option<Side>) -> String {
        let base = self.label_for(key);
        match side {
            Some(side) => format!("{base} ({})", side.german()),
            None => base.to_string(),
        }
    }

    /// Find the structure whose synonym is the longest substring of `text`.
    ///
    /// Equal-length matches keep the first one in table order.
    pub fn find_structure(&self, text: &str) -> Option<&StructureEntry> {
        let text = normalize(text);
        let mut best: Option<(usize, &StructureEntry)> = None;

        for (entry, synonyms) in self.entries.iter().zip(&self.normalized) {
            for synonym in synonyms {
                if synonym.is_empty() || !text.contains(synonym.as_str()) {
                    continue;
                }
                let score = synonym.len();
                if best.map_or(true, |(best_score, _)| score > best_score) {
                    best = Some((score, entry));
                }
            }
        }

        best.map(|(_, entry)| entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_of(text: &str) -> Option<&'static str> {
        Dictionary::builtin()
            .find_structure(text)
            .map(|e| e.key.as_str())
    }

    #[test]
    fn test_builtin_keys_are_unique() {
        let dict = Dictionary::builtin();
        let mut keys: Vec<_> = dict.entries().iter().map(|e| e.key.as_str()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), dict.entries().len());
        assert_eq!(dict.entries().len(), 9);
    }

    #[test]
    fn test_longest_synonym_wins() {
        let dict = Dictionary::new(vec![
            StructureEntry::new("short", Category::Muscle, "Short", &["biceps"]),
            StructureEntry::new("long", Category::Muscle, "Long", &["biceps brachii"]),
        ]);
        let hit = dict.find_structure("Schmerz im Biceps brachii links");
        assert_eq!(hit.map(|e| e.key.as_str()), Some("long"));

        let hit = dict.find_structure("biceps");
        assert_eq!(hit.map(|e| e.key.as_str()), Some("short"));
    }

    #[test]
    fn test_equal_length_keeps_first_entry() {
        let dict = Dictionary::new(vec![
            StructureEntry::new("first", Category::Bone, "First", &["abc"]),
            StructureEntry::new("second", Category::Bone, "Second", &["abc"]),
        ]);
        assert_eq!(
            dict.find_structure("xx abc xx").map(|e| e.key.as_str()),
            Some("first")
        );
    }

    #[test]
    fn test_builtin_matches() {
        assert_eq!(key_of("Brachialis rechts Schmerz 6/10"), Some("brachialis"));
        assert_eq!(key_of("Wirbelsäule tut weh"), Some("spine"));
        assert_eq!(key_of("vorderer Oberschenkel"), Some("quad"));
        assert_eq!(key_of("Oberschenkelknochen"), Some("femur"));
        assert_eq!(key_of("N. radialis"), Some("radial"));
        assert_eq!(key_of("Ischias links"), Some("sciatic"));
        assert_eq!(key_of("Knie"), None);
        assert_eq!(key_of(""), None);
    }

    #[test]
    fn test_biceps_brachii_resolves_to_biceps() {
        assert_eq!(key_of("biceps brachii rechts"), Some("biceps"));
        assert_eq!(key_of("Bizepsmuskel"), Some("biceps"));
    }

    #[test]
    fn test_pretty_label() {
        let dict = Dictionary::builtin();
        assert_eq!(
            dict.pretty_label("brachialis", Some(Side::Right)),
            "Brachialis (rechts)"
        );
        assert_eq!(dict.pretty_label("femur", Some(Side::Left)), "Femur (links)");
        assert_eq!(dict.pretty_label("spine", None), "Wirbelsäule");
        assert_eq!(dict.pretty_label("unknown", None), "unknown");
    }
}
