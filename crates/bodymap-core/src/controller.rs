//! Selection and view controller.
//!
//! One [`Controller`] owns the whole application state and exposes one method
//! per user action. Every action runs to completion and reports a [`Status`];
//! none of them fail.
//!
//! ```text
//! NoSelection ──click/voice/find──▶ Selected(region) ──click──▶ Selected(other)
//!      ▲                                  │
//!      └──────clear / delete / session────┘
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::annotation::{now_millis, Annotation, AnnotationStore, Intensity, Session};
use crate::diagram::DiagramModel;
use crate::dictionary::{Category, Dictionary};
use crate::error::BodyMapResult;
use crate::geometry::Point;
use crate::normalize::normalize;
use crate::persistence::AnnotationPersistence;
use crate::projection::{list_rows, project, ListRow, Projection};
use crate::resolver::{resolve, Side};
use crate::status::Status;
use crate::view::{Isolation, Layer, ViewState};

/// Command run by the "load example" action.
pub const EXAMPLE_COMMAND: &str = "Brachialis rechts Schmerz 6/10 distal seit 3 Wochen";

/// Voice commands mentioning pain pre-fill an empty note.
const PAIN_KEYWORD: &str = "schmerz";

/// The single active region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub region_id: String,
    pub category: Category,
    pub structure: String,
    pub side: Option<Side>,
}

/// Everything the controller mutates.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub view: ViewState,
    pub selection: Option<Selection>,
    /// Contents of the note editor.
    pub note: String,
    pub annotations: AnnotationStore,
}

/// A user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetLayer { layer: Layer, on: bool },
    SetIsolation(Isolation),
    SetIntensity(i64),
    SetSession(i64),
    /// Click a region or jump to it from the list.
    Select(String),
    SetNote(String),
    SaveNote,
    DeleteSelection,
    Find(String),
    Clear,
    Voice(String),
    LoadExample,
    Reset,
}

pub struct Controller<D, P> {
    diagram: D,
    persistence: P,
    dictionary: Dictionary,
    state: AppState,
}

impl<D: DiagramModel, P: AnnotationPersistence> Controller<D, P> {
    /// Create a controller with the built-in dictionary, loading any stored
    /// annotations.
    pub fn new(diagram: D, persistence: P) -> Self {
        Self::with_dictionary(diagram, persistence, Dictionary::builtin().clone())
    }

    pub fn with_dictionary(diagram: D, persistence: P, dictionary: Dictionary) -> Self {
        let records = persistence.load().unwrap_or_default();
        let state = AppState {
            annotations: AnnotationStore::from_records(records),
            ..AppState::default()
        };
        debug!(annotations = state.annotations.len(), "Controller ready");
        Self {
            diagram,
            persistence,
            dictionary,
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn diagram(&self) -> &D {
        &self.diagram
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    // =========================================================================
    // View controls
    // =========================================================================

    pub fn set_layer(&mut self, layer: Layer, on: bool) {
        self.state.view.layers.set(layer, on);
    }

    pub fn set_isolation(&mut self, isolation: Isolation) {
        self.state.view.isolation = isolation;
    }

    /// Move the live intensity slider. Stored annotations are unaffected.
    pub fn set_intensity(&mut self, value: i64) {
        self.state.view.intensity = Intensity::clamped(value);
    }

    /// Switch sessions. Always drops the selection and the note draft.
    pub fn set_session(&mut self, value: i64) {
        self.state.view.session = Session::clamped(value);
        self.clear_active();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select a region by id and load its note for the current session.
    pub fn select_region(&mut self, id: &str) -> Status {
        let Some(region) = self.diagram.region_by_id(id) else {
            return Status::UnknownRegion { id: id.to_string() };
        };
        let selection = Selection {
            region_id: region.id.clone(),
            category: region.category,
            structure: region.structure.clone(),
            side: region.side,
        };

        let label = self
            .dictionary
            .pretty_label(&selection.structure, selection.side);
        let category = selection.category;

        self.state.note = self
            .state
            .annotations
            .get(self.state.view.session, &selection.region_id)
            .map(|a| a.note.clone())
            .unwrap_or_default();
        self.state.selection = Some(selection);

        Status::Selected { label, category }
    }

    /// Drop the selection and empty the note editor.
    pub fn clear(&mut self) -> Status {
        self.clear_active();
        Status::Cleared
    }

    /// Select the first region whose id, structure or label contains the query.
    pub fn find(&mut self, query: &str) -> Status {
        let q = normalize(query);
        if q.is_empty() {
            return Status::EmptyQuery;
        }
        let Some(id) = self
            .diagram
            .search(&q, &self.dictionary)
            .map(|r| r.id.clone())
        else {
            return Status::NotFound { query: q };
        };
        self.select_region(&id)
    }

    // =========================================================================
    // Annotations
    // =========================================================================

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.state.note = note.into();
    }

    /// Create or update the annotation of the selected region.
    ///
    /// The pin is always placed at the region's bounding-box center.
    pub fn save_note(&mut self) -> Status {
        let Some(selection) = self.state.selection.clone() else {
            return Status::NoSelection;
        };

        let label = self
            .dictionary
            .pretty_label(&selection.structure, selection.side);
        let session = self.state.view.session;
        let pin = self
            .diagram
            .bounding_center(&selection.region_id)
            .map(Point::rounded);

        let draft = Annotation {
            session,
            region_id: selection.region_id,
            category: selection.category,
            structure: selection.structure,
            side: selection.side,
            label: label.clone(),
            intensity: self.state.view.intensity,
            note: self.state.note.trim().to_string(),
            pin,
            updated_at: now_millis(),
        };
        self.state.annotations.upsert(draft);

        if let Err(err) = self.persist() {
            return Status::SaveFailed {
                reason: err.to_string(),
            };
        }
        Status::Saved { label, session }
    }

    /// Remove the selected region's annotation (if any) and drop the selection.
    pub fn delete_selection(&mut self) -> Status {
        let Some(selection) = self.state.selection.take() else {
            return Status::NoSelection;
        };
        let removed = self
            .state
            .annotations
            .remove(self.state.view.session, &selection.region_id)
            .is_some();
        self.clear_active();

        if removed {
            debug!(region = %selection.region_id, "Deleted annotation");
            if let Err(err) = self.persist() {
                return Status::SaveFailed {
                    reason: err.to_string(),
                };
            }
        }
        Status::Deleted { removed }
    }

    // =========================================================================
    // Voice
    // =========================================================================

    /// Resolve a free-text command and select the named region.
    ///
    /// A detected intensity moves the slider and the structure's layer is
    /// switched on. If the command mentions pain and the note editor is
    /// blank, the command itself becomes the note.
    pub fn run_voice(&mut self, command: &str) -> Status {
        let Some(resolution) = resolve(&self.dictionary, command) else {
            debug!(command, "Voice command names no structure");
            return Status::VoiceNoStructure;
        };
        let key = resolution.structure.key.clone();
        let label = resolution.structure.label.clone();
        let category = resolution.structure.category;
        let side = resolution.side;

        if let Some(intensity) = resolution.intensity {
            self.state.view.intensity = intensity;
        }
        self.state.view.layers.set(category.layer(), true);

        let Some(region_id) = self
            .diagram
            .resolve_region(&key, side)
            .map(|r| r.id.clone())
        else {
            return Status::VoiceNoRegion { structure: key };
        };
        self.select_region(&region_id);

        if normalize(command).contains(PAIN_KEYWORD) && self.state.note.trim().is_empty() {
            self.state.note = command.trim().to_string();
        }

        info!(structure = %key, region = %region_id, side = ?side, intensity = %self.state.view.intensity, "Voice command resolved");
        Status::Voice {
            label,
            side,
            intensity: self.state.view.intensity,
        }
    }

    pub fn load_example(&mut self) -> Status {
        self.run_voice(EXAMPLE_COMMAND)
    }

    /// Restore default view settings. Annotations and session are kept.
    pub fn reset(&mut self) -> Status {
        self.clear_active();
        self.state.view.reset();
        Status::Reset
    }

    // =========================================================================
    // Dispatch and projection
    // =========================================================================

    /// Route an action to its handler. View-only actions report nothing.
    pub fn dispatch(&mut self, action: Action) -> Option<Status> {
        match action {
            Action::SetLayer { layer, on } => {
                self.set_layer(layer, on);
                None
            }
            Action::SetIsolation(isolation) => {
                self.set_isolation(isolation);
                None
            }
            Action::SetIntensity(value) => {
                self.set_intensity(value);
                None
            }
            Action::SetSession(value) => {
                self.set_session(value);
                None
            }
            Action::Select(id) => Some(self.select_region(&id)),
            Action::SetNote(note) => {
                self.set_note(note);
                None
            }
            Action::SaveNote => Some(self.save_note()),
            Action::DeleteSelection => Some(self.delete_selection()),
            Action::Find(query) => Some(self.find(&query)),
            Action::Clear => Some(self.clear()),
            Action::Voice(command) => Some(self.run_voice(&command)),
            Action::LoadExample => Some(self.load_example()),
            Action::Reset => Some(self.reset()),
        }
    }

    /// Current visuals of the diagram.
    pub fn projection(&self) -> Projection {
        project(
            &self.diagram,
            &self.state.view,
            &self.state.annotations,
            self.state.selection.as_ref(),
        )
    }

    /// Annotation list of the current session, newest first.
    pub fn rows(&self) -> Vec<ListRow> {
        list_rows(&self.state.annotations, self.state.view.session)
    }

    fn clear_active(&mut self) {
        self.state.selection = None;
        self.state.note.clear();
    }

    fn persist(&mut self) -> BodyMapResult<()> {
        self.persistence
            .save(self.state.annotations.as_slice())
            .inspect_err(|err| warn!(error = %err, "Failed to persist annotations"))
    }
}
