//! Anatomical body map: phrase resolution, region selection and per-session
//! pain annotations over a static front-view diagram.
//!
//! ```text
//! "Brachialis rechts Schmerz 6/10"
//!        │ normalize + dictionary
//!        ▼
//!   Resolution { brachialis, Right, 6 } ──▶ Diagram region ──▶ Selection
//!                                                               │ save
//!                                                               ▼
//!                                   AnnotationStore ◀──▶ AnnotationPersistence
//! ```
//!
//! [`Controller`] ties the pieces together; [`project`] derives what to draw.

pub mod annotation;
pub mod controller;
pub mod diagram;
pub mod dictionary;
pub mod error;
pub mod geometry;
pub mod normalize;
pub mod persistence;
pub mod projection;
pub mod resolver;
pub mod status;
pub mod view;

pub use annotation::{Annotation, AnnotationStore, Intensity, Session, Upsert};
pub use controller::{Action, AppState, Controller, Selection, EXAMPLE_COMMAND};
pub use diagram::{Diagram, DiagramAsset, DiagramModel, Region, RegionSpec, SilhouettePath};
pub use dictionary::{Category, Dictionary, StructureEntry};
pub use error::{BodyMapError, BodyMapResult};
pub use geometry::{BoundingBox, PathData, Point};
pub use normalize::normalize;
pub use persistence::{AnnotationPersistence, JsonFileStore, MemoryStore, STORAGE_KEY};
pub use projection::{
    empty_list_message, list_rows, project, LayerVisual, ListRow, Projection, RegionVisual, Rgba,
};
pub use resolver::{detect_intensity, detect_side, resolve, Resolution, Side};
pub use status::Status;
pub use view::{Isolation, Layer, LayerFlags, ViewState};
