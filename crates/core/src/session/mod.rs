//! Editing session: the single entry point a designer front end drives.
//!
//! [`EditorSession`] owns the label settings, the scene, the undo history,
//! and the clipboard. Every mutating call that succeeds records exactly one
//! history snapshot, except drags and typed property edits, which stay
//! pending until [`EditorSession::end_drag`] or
//! [`EditorSession::commit_edit`] closes them. A pending change is also
//! closed, as its own snapshot, before any other committing call.

/// Editable object properties.
pub mod property;

use serde::Serialize;
use tracing::{debug, warn};
use zpl_label_diagnostics::Diagnostic;
use zpl_label_settings::{LabelSettings, SettingsError};

use crate::decode::decode_zpl;
use crate::encode::encode_scene;
use crate::history::HistoryManager;
use crate::project::ProjectFile;
use crate::scene::{ObjectId, ObjectType, Scene, SceneObject};
use crate::validate::{ValidationResult, validate_zpl};

pub use property::Property;

/// Where new objects land before grid snapping.
pub const DEFAULT_ANCHOR: (i32, i32) = (50, 50);
/// Offset of a pasted copy from its source.
pub const PASTE_OFFSET: (i32, i32) = (20, 20);

/// Direction for [`EditorSession::reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// One step towards the top (painted later).
    Forward,
    /// One step towards the bottom (painted earlier).
    Backward,
}

/// How imported objects combine with the current scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Discard the current objects first.
    #[default]
    Replace,
    /// Add on top of the current objects.
    Append,
}

/// Outcome of [`EditorSession::import_zpl`].
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    /// Ids of the objects added to the scene.
    pub imported: Vec<ObjectId>,
    /// Importer notes on skipped content.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Drag,
    Edit,
}

/// Label editing state for one open design.
#[derive(Debug, Clone)]
pub struct EditorSession {
    settings: LabelSettings,
    scene: Scene,
    history: HistoryManager,
    clipboard: Option<SceneObject>,
    pending: Option<Pending>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Empty design with default settings; the history holds its initial state.
    pub fn new() -> Self {
        let scene = Scene::new();
        let mut history = HistoryManager::new();
        history.commit(&scene);
        Self {
            settings: LabelSettings::default(),
            scene,
            history,
            clipboard: None,
            pending: None,
        }
    }

    /// Empty design with the given settings.
    pub fn with_settings(settings: LabelSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut session = Self::new();
        session.settings = settings;
        Ok(session)
    }

    /// Session restored from a project file, with a fresh history.
    pub fn from_project(project: ProjectFile) -> Self {
        let (settings, scene) = project.into_parts();
        let mut history = HistoryManager::new();
        history.commit(&scene);
        Self {
            settings,
            scene,
            history,
            clipboard: None,
            pending: None,
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────

    /// Current label settings.
    pub fn settings(&self) -> &LabelSettings {
        &self.settings
    }

    /// Replace the label settings. Settings are not part of the undo history.
    pub fn set_settings(&mut self, settings: LabelSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Current scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Undo history.
    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Object held by the clipboard.
    pub fn clipboard(&self) -> Option<&SceneObject> {
        self.clipboard.as_ref()
    }

    /// `true` while a drag or typed edit has not been committed yet.
    pub fn has_pending_change(&self) -> bool {
        self.pending.is_some()
    }

    // ── Creation and removal ───────────────────────────────────────────

    /// Add an object of type `ty` with default size and content at the
    /// (snapped) default anchor, and select it.
    pub fn add(&mut self, ty: ObjectType) -> ObjectId {
        self.add_with(ty, |_| {})
    }

    /// Like [`EditorSession::add`], letting `customize` override the defaults
    /// before the object is stored. The id is assigned by the session.
    pub fn add_with(&mut self, ty: ObjectType, customize: impl FnOnce(&mut SceneObject)) -> ObjectId {
        self.flush_pending();
        let (x, y) = self.settings.snap(DEFAULT_ANCHOR.0, DEFAULT_ANCHOR.1);
        let fresh = self.scene.fresh_id();
        let mut object = SceneObject::with_defaults(ty, fresh.clone(), x, y);
        customize(&mut object);
        clamp_extents(&mut object);
        object.id = fresh;

        let id = self.scene.push(object);
        self.scene.select(&id);
        self.commit("add");
        id
    }

    /// Remove an object. Returns `false` if it does not exist.
    pub fn delete(&mut self, id: &ObjectId) -> bool {
        self.flush_pending();
        if self.scene.remove(id).is_none() {
            return false;
        }
        self.scene.clear_selection();
        self.commit("delete");
        true
    }

    /// Remove the selected object. Returns `false` when nothing is selected.
    pub fn delete_selected(&mut self) -> bool {
        match self.scene.selected().cloned() {
            Some(id) => self.delete(&id),
            None => false,
        }
    }

    /// Remove every object. Returns `false` if the scene was already empty.
    pub fn clear(&mut self) -> bool {
        self.flush_pending();
        if self.scene.is_empty() {
            return false;
        }
        self.scene.clear();
        self.commit("clear");
        true
    }

    // ── Moving ─────────────────────────────────────────────────────────

    /// Move an object by `(dx, dy)`, snapping the result to the grid.
    ///
    /// Part of a drag gesture: nothing is recorded until
    /// [`EditorSession::end_drag`]. Returns `true` if the position changed.
    pub fn move_by(&mut self, id: &ObjectId, dx: i32, dy: i32) -> bool {
        self.close_other_pending(Pending::Drag);
        let settings = &self.settings;
        let Some(object) = self.scene.get_mut(id) else {
            return false;
        };
        let (x, y) = settings.snap(object.x.saturating_add(dx), object.y.saturating_add(dy));
        if (x, y) == (object.x, object.y) {
            return false;
        }
        object.x = x;
        object.y = y;
        self.mark_pending(Pending::Drag);
        true
    }

    /// Finish a drag gesture, recording one snapshot if anything moved.
    pub fn end_drag(&mut self) -> bool {
        self.flush_pending()
    }

    /// Move an object and record the move immediately (keyboard nudge).
    pub fn nudge(&mut self, id: &ObjectId, dx: i32, dy: i32) -> bool {
        self.flush_pending();
        let moved = self.move_by(id, dx, dy);
        self.flush_pending();
        moved
    }

    // ── Property edits ─────────────────────────────────────────────────

    /// Set one property from text input.
    ///
    /// Returns `false` when the object does not exist, lacks the property,
    /// or the value does not parse; nothing changes in that case. Picker
    /// and toggle properties are recorded at once; typed values are recorded
    /// by [`EditorSession::commit_edit`].
    pub fn set_property(&mut self, id: &ObjectId, property: Property, value: &str) -> bool {
        if property.commits_immediately() {
            self.flush_pending();
        } else {
            self.close_other_pending(Pending::Edit);
        }
        let Some(object) = self.scene.get_mut(id) else {
            return false;
        };
        if !property::apply(object, property, value) {
            return false;
        }
        self.mark_pending(Pending::Edit);
        if property.commits_immediately() {
            self.flush_pending();
        }
        true
    }

    /// Record pending typed edits (the input field lost focus).
    pub fn commit_edit(&mut self) -> bool {
        self.flush_pending()
    }

    /// Apply several edits to one object as a single undoable step.
    /// Returns how many edits were accepted.
    pub fn apply_edits(&mut self, id: &ObjectId, edits: &[(Property, &str)]) -> usize {
        self.flush_pending();
        let Some(object) = self.scene.get_mut(id) else {
            return 0;
        };
        let applied = edits
            .iter()
            .filter(|(property, value)| property::apply(object, *property, value))
            .count();
        if applied > 0 {
            self.commit("apply edits");
        }
        applied
    }

    // ── Stacking order ─────────────────────────────────────────────────

    /// Swap an object with its neighbour. Returns `false` at either end of
    /// the stack or for an unknown id.
    pub fn reorder(&mut self, id: &ObjectId, direction: Direction) -> bool {
        self.flush_pending();
        let Some(index) = self.scene.index_of(id) else {
            return false;
        };
        let neighbour = match direction {
            Direction::Forward if index + 1 < self.scene.len() => index + 1,
            Direction::Backward if index > 0 => index - 1,
            _ => return false,
        };
        self.scene.swap(index, neighbour);
        self.commit("reorder");
        true
    }

    // ── Clipboard ──────────────────────────────────────────────────────

    /// Copy an object to the clipboard. Returns `false` for an unknown id.
    pub fn copy(&mut self, id: &ObjectId) -> bool {
        match self.scene.get(id) {
            Some(object) => {
                self.clipboard = Some(object.clone());
                true
            }
            None => false,
        }
    }

    /// Copy the selected object to the clipboard.
    pub fn copy_selected(&mut self) -> bool {
        match self.scene.selected().cloned() {
            Some(id) => self.copy(&id),
            None => false,
        }
    }

    /// Add a copy of the clipboard object with a new id, offset by (+20, +20),
    /// and select it. Returns `None` when the clipboard is empty.
    pub fn paste(&mut self) -> Option<ObjectId> {
        self.flush_pending();
        let mut object = self.clipboard.clone()?;
        object.id = self.scene.fresh_id();
        object.x = object.x.saturating_add(PASTE_OFFSET.0);
        object.y = object.y.saturating_add(PASTE_OFFSET.1);

        let id = self.scene.push(object);
        self.scene.select(&id);
        self.commit("paste");
        Some(id)
    }

    // ── Selection ──────────────────────────────────────────────────────

    /// Make `id` the sole selection. Returns `false` for an unknown id.
    pub fn select(&mut self, id: &ObjectId) -> bool {
        self.scene.select(id)
    }

    /// Select the top-most object under `(x, y)`, or clear the selection.
    pub fn select_at(&mut self, x: i32, y: i32) -> Option<ObjectId> {
        let hit = self.scene.hit_test(x, y).map(|o| o.id.clone());
        match &hit {
            Some(id) => {
                self.scene.select(id);
            }
            None => self.scene.clear_selection(),
        }
        hit
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.scene.clear_selection();
    }

    // ── History ────────────────────────────────────────────────────────

    /// Step back one recorded change. The selection is cleared.
    pub fn undo(&mut self) -> bool {
        self.flush_pending();
        let done = self.history.undo(&mut self.scene);
        if done {
            debug!(undo_depth = self.history.undo_depth(), "undo");
        }
        done
    }

    /// Re-apply the last undone change. The selection is cleared.
    pub fn redo(&mut self) -> bool {
        self.flush_pending();
        let done = self.history.redo(&mut self.scene);
        if done {
            debug!(redo_depth = self.history.redo_depth(), "redo");
        }
        done
    }

    /// `true` when [`EditorSession::undo`] would change the scene.
    pub fn can_undo(&self) -> bool {
        self.pending.is_some() || self.history.can_undo()
    }

    /// `true` when [`EditorSession::redo`] would change the scene.
    pub fn can_redo(&self) -> bool {
        self.pending.is_none() && self.history.can_redo()
    }

    // ── Projects and ZPL ───────────────────────────────────────────────

    /// Start over: default settings, empty scene, fresh history.
    pub fn new_project(&mut self) {
        self.settings = LabelSettings::default();
        self.scene.clear();
        self.pending = None;
        self.history.reset(&self.scene);
        debug!("new project");
    }

    /// Start over with the given settings.
    pub fn new_project_with(&mut self, settings: LabelSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.new_project();
        self.settings = settings;
        Ok(())
    }

    /// Replace settings and objects with a loaded project.
    ///
    /// The load is one undoable step on top of the existing history: undo
    /// brings back the previous objects. Settings are not part of the
    /// history and stay as loaded. The selection is cleared.
    pub fn load_project(&mut self, project: ProjectFile) {
        self.flush_pending();
        let (settings, scene) = project.into_parts();
        self.settings = settings;
        self.scene = scene;
        self.scene.clear_selection();
        self.commit("load project");
        debug!(objects = self.scene.len(), "project loaded");
    }

    /// Snapshot of the design for saving.
    pub fn to_project(&self) -> ProjectFile {
        ProjectFile::from_scene(&self.settings, &self.scene)
    }

    /// Import ZPL text. Nothing changes and nothing is recorded when the
    /// text yields no objects.
    pub fn import_zpl(&mut self, text: &str, mode: ImportMode) -> ImportSummary {
        self.flush_pending();
        let decoded = decode_zpl(text);
        if decoded.objects.is_empty() {
            warn!("import found no objects");
            return ImportSummary {
                imported: Vec::new(),
                diagnostics: decoded.diagnostics,
            };
        }

        if mode == ImportMode::Replace {
            self.scene.clear();
        }
        let imported = decoded
            .objects
            .into_iter()
            .map(|object| self.scene.push(object))
            .collect::<Vec<_>>();
        self.scene.clear_selection();
        self.commit("import");

        debug!(count = imported.len(), ?mode, "imported ZPL");
        ImportSummary {
            imported,
            diagnostics: decoded.diagnostics,
        }
    }

    /// ZPL for the current design.
    pub fn export_zpl(&self) -> String {
        encode_scene(&self.scene, &self.settings)
    }

    /// Validate the ZPL the current design exports to.
    pub fn validate(&self) -> ValidationResult {
        validate_zpl(&self.export_zpl())
    }

    // ── Internals ──────────────────────────────────────────────────────

    /// Record a pending change of a different kind before `kind` starts, so
    /// a drag and a typed edit never share a snapshot.
    fn close_other_pending(&mut self, kind: Pending) {
        if self.pending.is_some_and(|p| p != kind) {
            self.flush_pending();
        }
    }

    fn mark_pending(&mut self, kind: Pending) {
        if self.pending.is_none() {
            self.pending = Some(kind);
        }
    }

    /// Record a pending drag or edit. Returns `true` if one was pending.
    fn flush_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(Pending::Drag) => {
                self.commit("drag");
                true
            }
            Some(Pending::Edit) => {
                self.commit("edit");
                true
            }
            None => false,
        }
    }

    fn commit(&mut self, op: &'static str) {
        self.history.commit(&self.scene);
        debug!(op, undo_depth = self.history.undo_depth(), "recorded");
    }
}

fn clamp_extents(object: &mut SceneObject) {
    object.width = object.width.max(0);
    object.height = object.height.max(0);
}
