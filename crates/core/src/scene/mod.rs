//! The ordered collection of objects placed on a label.

/// Placeable label primitives.
pub mod object;

pub use object::{ObjectId, ObjectKind, ObjectType, SceneObject, Symbology};

/// Ordered set of scene objects plus the current selection.
///
/// Index 0 is the bottom of the stack; order is both paint order and the
/// order objects are exported in. Identifiers are unique and at most one
/// object is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scene {
    objects: Vec<SceneObject>,
    selected: Option<ObjectId>,
}

impl Scene {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from objects, renaming any object whose id repeats an earlier one.
    pub fn from_objects(objects: impl IntoIterator<Item = SceneObject>) -> Self {
        let mut scene = Self::new();
        scene.extend(objects);
        scene
    }

    /// Objects bottom to top.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Iterate objects bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, SceneObject> {
        self.objects.iter()
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// `true` when the scene holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Position of `id` in the stacking order.
    pub fn index_of(&self, id: &ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| &o.id == id)
    }

    /// `true` when an object with `id` exists.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Look up an object.
    pub fn get(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| &o.id == id)
    }

    /// Look up an object for in-place editing.
    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| &o.id == id)
    }

    /// Identifier not used by any object in the scene.
    pub fn fresh_id(&self) -> ObjectId {
        loop {
            let id = ObjectId::generate();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Append `object` on top, giving it a fresh id if its id is already taken.
    /// Returns the id it was stored under.
    pub fn push(&mut self, mut object: SceneObject) -> ObjectId {
        if self.contains(&object.id) {
            object.id = self.fresh_id();
        }
        let id = object.id.clone();
        self.objects.push(object);
        id
    }

    /// Append every object in order (see [`Scene::push`]).
    pub fn extend(&mut self, objects: impl IntoIterator<Item = SceneObject>) {
        for object in objects {
            self.push(object);
        }
    }

    /// Remove and return an object; drops the selection if it pointed at it.
    pub fn remove(&mut self, id: &ObjectId) -> Option<SceneObject> {
        let index = self.index_of(id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Some(self.objects.remove(index))
    }

    /// Remove every object and the selection.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.selected = None;
    }

    /// Exchange the stacking positions of two objects.
    ///
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.objects.swap(a, b);
    }

    /// Replace all objects with a snapshot and drop the selection.
    pub fn restore(&mut self, objects: Vec<SceneObject>) {
        self.objects = objects;
        self.selected = None;
    }

    // ── Selection ──────────────────────────────────────────────────────

    /// Make `id` the sole selection. Returns `false` if no such object exists.
    pub fn select(&mut self, id: &ObjectId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Identifier of the selected object.
    pub fn selected(&self) -> Option<&ObjectId> {
        self.selected.as_ref()
    }

    /// The selected object.
    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// `true` when `id` is the selected object.
    pub fn is_selected(&self, id: &ObjectId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Top-most object whose bounding box contains `(x, y)`.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<&SceneObject> {
        self.objects.iter().rev().find(|o| o.contains_point(x, y))
    }
}
