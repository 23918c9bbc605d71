//! ZPL label designer core.
//!
//! Holds the editable scene of a label design and converts it to and from
//! ZPL (Zebra Programming Language). The main entry points are
//! [`EditorSession`] for editing with undo/redo, [`encode_scene`] for
//! export, [`decode_zpl`] for best-effort import, and [`validate_zpl`] for
//! structural checks on label text.

#![warn(missing_docs)]

#[macro_use]
mod macros;

/// ZPL importer.
pub mod decode;
/// ZPL encoder.
pub mod encode;
/// Snapshot undo/redo.
pub mod history;
/// Project file load and save.
pub mod project;
/// Scene objects and their container.
pub mod scene;
/// Editing session.
pub mod session;
/// Structural validation of label text.
pub mod validate;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Scene
pub use scene::{ObjectId, ObjectKind, ObjectType, Scene, SceneObject, Symbology};

// Codec
pub use decode::{DecodeResult, decode, decode_zpl};
pub use encode::{encode_objects, encode_scene};

// Validator
pub use validate::{ValidationResult, validate_zpl};

// History and session
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryManager};
pub use session::{Direction, EditorSession, ImportMode, ImportSummary, Property};

// Project files
pub use project::{ObjectRecord, ProjectError, ProjectFile};

// Diagnostics and settings (re-exported from their crates)
pub use zpl_label_diagnostics::{Diagnostic, Severity, Span, codes};
pub use zpl_label_settings::{LabelSettings, Orientation, SettingsError};
