//! Human-readable outcome of a user action.
//!
//! Every action reports one of these instead of failing. Text is German to
//! match the dictionary labels.

use std::fmt;

use serde::Serialize;

use crate::annotation::{Intensity, Session};
use crate::dictionary::Category;
use crate::resolver::Side;

/// Example command suggested when voice input names no structure.
pub const VOICE_HINT: &str = "Brachialis rechts Schmerz 6/10";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Status {
    Ready,
    Selected {
        label: String,
        category: Category,
    },
    UnknownRegion {
        id: String,
    },
    Saved {
        label: String,
        session: Session,
    },
    SaveFailed {
        reason: String,
    },
    NoSelection,
    Deleted {
        removed: bool,
    },
    EmptyQuery,
    NotFound {
        query: String,
    },
    Cleared,
    VoiceNoStructure,
    VoiceNoRegion {
        structure: String,
    },
    Voice {
        label: String,
        side: Option<Side>,
        intensity: Intensity,
    },
    Reset,
}

impl Status {
    /// No-match and no-selection outcomes; the action changed nothing.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Status::UnknownRegion { .. }
                | Status::SaveFailed { .. }
                | Status::NoSelection
                | Status::EmptyQuery
                | Status::NotFound { .. }
                | Status::VoiceNoStructure
                | Status::VoiceNoRegion { .. }
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => f.write_str("Klick auf eine Struktur oder nutze Voice/Suche."),
            Status::Selected { label, category } => write!(f, "Auswahl: {label} ({category})"),
            Status::UnknownRegion { id } => write!(f, "Unbekannte Region: {id}"),
            Status::Saved { label, session } => {
                write!(f, "Gespeichert: {label} (Session {session})")
            }
            Status::SaveFailed { reason } => write!(f, "Speichern fehlgeschlagen: {reason}"),
            Status::NoSelection => {
                f.write_str("Keine Auswahl. Bitte zuerst eine Struktur anklicken.")
            }
            Status::Deleted { removed: true } => f.write_str("Markierung gelöscht."),
            Status::Deleted { removed: false } => f.write_str("Keine Markierung vorhanden."),
            Status::EmptyQuery => f.write_str("Bitte Suchbegriff eingeben."),
            Status::NotFound { query } => write!(f, "Keine Struktur gefunden für: {query}"),
            Status::Cleared => f.write_str("Auswahl zurückgesetzt."),
            Status::VoiceNoStructure => write!(
                f,
                "Voice: Keine Struktur erkannt. (Beispiel: \"{VOICE_HINT}\")"
            ),
            Status::VoiceNoRegion { structure } => write!(
                f,
                "Voice: Struktur erkannt ({structure}), aber keine Region im Diagramm gefunden."
            ),
            Status::Voice {
                label,
                side,
                intensity,
            } => {
                write!(f, "Voice: {label}")?;
                if let Some(side) = side {
                    write!(f, " ({})", side.german())?;
                }
                write!(f, " • Intensität {intensity}/10")
            }
            Status::Reset => f.write_str("Reset."),
        }
    }
}
