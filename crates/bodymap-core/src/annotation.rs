//! Annotation records and the per-session annotation store.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dictionary::Category;
use crate::geometry::Point;
use crate::resolver::Side;

// =============================================================================
// Scalar types
// =============================================================================

/// Pain intensity on a 1..=10 scale. Out-of-range input is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub const fn clamped(value: i64) -> Self {
        let v = if value < Self::MIN as i64 {
            Self::MIN
        } else if value > Self::MAX as i64 {
            Self::MAX
        } else {
            value as u8
        };
        Self(v)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Fill opacity ramp: 1 maps to 0.18, 10 maps to 0.80, linear in between.
    pub fn opacity(self) -> f64 {
        0.18 + f64::from(self.0 - 1) * (0.62 / 9.0)
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(6)
    }
}

impl From<i64> for Intensity {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Intensity> for u8 {
    fn from(value: Intensity) -> Self {
        value.0
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Treatment session number, 1..=6. Out-of-range input is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Session(u8);

impl Session {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub const fn clamped(value: i64) -> Self {
        let v = if value < Self::MIN as i64 {
            Self::MIN
        } else if value > Self::MAX as i64 {
            Self::MAX
        } else {
            value as u8
        };
        Self(v)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Session {
    fn default() -> Self {
        Self(1)
    }
}

impl From<i64> for Session {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Session> for u8 {
    fn from(value: Session) -> Self {
        value.0
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// =============================================================================
// Annotation
// =============================================================================

/// A note attached to one region in one session.
///
/// Field names follow the persisted JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub session: Session,
    pub region_id: String,
    #[serde(rename = "layer")]
    pub category: Category,
    pub structure: String,
    #[serde(default)]
    pub side: Option<Side>,
    /// Label snapshot taken when the annotation was created.
    pub label: String,
    pub intensity: Intensity,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<Point>,
    #[serde(default)]
    pub updated_at: u64,
}

/// Whether an upsert created a record or overwrote one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

// =============================================================================
// Store
// =============================================================================

/// All annotations, at most one per `(session, region_id)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded records. Later duplicates of a
    /// `(session, region_id)` pair replace earlier ones.
    pub fn from_records(records: Vec<Annotation>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.upsert(record);
        }
        store
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn get(&self, session: Session, region_id: &str) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|a| a.session == session && a.region_id == region_id)
    }

    /// Insert `draft`, or overwrite note, intensity, pin and timestamp of the
    /// existing record for the same session and region.
    pub fn upsert(&mut self, draft: Annotation) -> Upsert {
        let existing = self
            .annotations
            .iter_mut()
            .find(|a| a.session == draft.session && a.region_id == draft.region_id);

        match existing {
            Some(existing) => {
                existing.note = draft.note;
                existing.intensity = draft.intensity;
                existing.pin = draft.pin;
                existing.updated_at = draft.updated_at;
                debug!(region = %existing.region_id, session = %existing.session, "Updated annotation");
                Upsert::Updated
            }
            None => {
                debug!(region = %draft.region_id, session = %draft.session, "Created annotation");
                self.annotations.push(draft);
                Upsert::Created
            }
        }
    }

    /// Remove the record for `(session, region_id)`, if any.
    pub fn remove(&mut self, session: Session, region_id: &str) -> Option<Annotation> {
        let idx = self
            .annotations
            .iter()
            .position(|a| a.session == session && a.region_id == region_id)?;
        Some(self.annotations.remove(idx))
    }

    /// Records of one session in insertion order.
    pub fn for_session(&self, session: Session) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(move |a| a.session == session)
    }

    /// Records of one session, most recently updated first.
    pub fn rows(&self, session: Session) -> Vec<&Annotation> {
        let mut rows: Vec<_> = self.for_session(session).collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(session: i64, region: &str, note: &str, updated_at: u64) -> Annotation {
        Annotation {
            session: Session::clamped(session),
            region_id: region.to_string(),
            category: Category::Muscle,
            structure: "quad".to_string(),
            side: Some(Side::Left),
            label: "Quadrizeps (links)".to_string(),
            intensity: Intensity::clamped(5),
            note: note.to_string(),
            pin: Some(Point::new(280.0, 580.0)),
            updated_at,
        }
    }

    #[test]
    fn test_intensity_clamp_and_ramp() {
        assert_eq!(Intensity::clamped(0).value(), 1);
        assert_eq!(Intensity::clamped(42).value(), 10);
        assert!((Intensity::clamped(1).opacity() - 0.18).abs() < 1e-9);
        assert!((Intensity::clamped(10).opacity() - 0.80).abs() < 1e-9);

        let ramp: Vec<f64> = (1..=10).map(|i| Intensity::clamped(i).opacity()).collect();
        assert!(ramp.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_session_clamp() {
        assert_eq!(Session::clamped(-3).value(), 1);
        assert_eq!(Session::clamped(9).value(), 6);
        assert_eq!(Session::default().value(), 1);
    }

    #[test]
    fn test_upsert_overwrites_same_pair() {
        let mut store = AnnotationStore::new();
        assert_eq!(store.upsert(draft(1, "muscle_quad_l", "a", 1)), Upsert::Created);

        let mut second = draft(1, "muscle_quad_l", "b", 2);
        second.intensity = Intensity::clamped(9);
        second.label = "ignored".to_string();
        assert_eq!(store.upsert(second), Upsert::Updated);

        assert_eq!(store.len(), 1);
        let a = store.get(Session::clamped(1), "muscle_quad_l").unwrap();
        assert_eq!(a.note, "b");
        assert_eq!(a.intensity.value(), 9);
        assert_eq!(a.updated_at, 2);
        // label is a creation-time snapshot
        assert_eq!(a.label, "Quadrizeps (links)");
    }

    #[test]
    fn test_sessions_are_separate_keys() {
        let mut store = AnnotationStore::new();
        store.upsert(draft(1, "muscle_quad_l", "s1", 1));
        store.upsert(draft(2, "muscle_quad_l", "s2", 2));
        assert_eq!(store.len(), 2);
        assert_eq!(store.for_session(Session::clamped(1)).count(), 1);
        assert!(store.get(Session::clamped(3), "muscle_quad_l").is_none());
    }

    #[test]
    fn test_remove_absent_is_none() {
        let mut store = AnnotationStore::new();
        store.upsert(draft(1, "muscle_quad_l", "", 1));
        assert!(store.remove(Session::clamped(1), "bone_spine").is_none());
        assert_eq!(store.len(), 1);
        assert!(store.remove(Session::clamped(1), "muscle_quad_l").is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn test_rows_newest_first() {
        let mut store = AnnotationStore::new();
        store.upsert(draft(1, "a", "", 10));
        store.upsert(draft(1, "b", "", 30));
        store.upsert(draft(1, "c", "", 20));
        store.upsert(draft(2, "d", "", 40));
        let ids: Vec<_> = store
            .rows(Session::clamped(1))
            .iter()
            .map(|a| a.region_id.as_str())
            .collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(draft(1, "muscle_quad_l", "x", 7)).unwrap();
        assert_eq!(json["regionId"], "muscle_quad_l");
        assert_eq!(json["layer"], "muscle");
        assert_eq!(json["side"], "left");
        assert_eq!(json["updatedAt"], 7);
        assert_eq!(json["pin"]["x"], 280.0);

        let mut no_pin = draft(1, "bone_spine", "", 1);
        no_pin.pin = None;
        no_pin.side = None;
        let json = serde_json::to_value(no_pin).unwrap();
        assert!(json.get("pin").is_none());
        assert!(json["side"].is_null());
    }

    #[test]
    fn test_from_records_dedupes() {
        let store = AnnotationStore::from_records(vec![
            draft(1, "a", "old", 1),
            draft(1, "a", "new", 2),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(Session::clamped(1), "a").unwrap().note, "new");
    }
}
