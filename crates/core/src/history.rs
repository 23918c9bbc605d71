//! Snapshot-based undo/redo.
//!
//! Each committed edit stores a full copy of the scene's objects. Snapshots
//! are reference-counted so moving them between the undo and redo stacks
//! never copies object data.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::trace;

use crate::scene::{Scene, SceneObject};

/// Number of snapshots kept on the undo stack.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Immutable copy of a scene's objects at one point in time.
pub type Snapshot = Arc<[SceneObject]>;

/// Bounded undo/redo stacks of scene snapshots.
///
/// The top of the undo stack is always the current state, so undo is
/// possible only while at least two snapshots are stored. Committing drops
/// the oldest snapshot once the stack is full and clears the redo stack.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    capacity: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryManager {
    /// History with the default capacity of 50 snapshots.
    pub fn new() -> Self {
        Self::default()
    }

    /// History holding at most `capacity` snapshots (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            redo_stack: Vec::new(),
            capacity,
        }
    }

    /// Record the scene as the new current state.
    pub fn commit(&mut self, scene: &Scene) {
        if self.undo_stack.len() >= self.capacity {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(Arc::from(scene.objects()));
        self.redo_stack.clear();
        trace!(
            undo_depth = self.undo_stack.len(),
            objects = scene.len(),
            "history commit"
        );
    }

    /// Step back one snapshot. Returns `false` (and leaves `scene` alone)
    /// when there is nothing older to go back to.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        if self.undo_stack.len() <= 1 {
            return false;
        }
        let Some(current) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push(current);
        let Some(previous) = self.undo_stack.back() else {
            return false;
        };
        scene.restore(previous.to_vec());
        true
    }

    /// Re-apply the most recently undone snapshot. Returns `false` when the
    /// redo stack is empty.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        scene.restore(next.to_vec());
        if self.undo_stack.len() >= self.capacity {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(next);
        true
    }

    /// Forget everything and start over from `scene`.
    pub fn reset(&mut self, scene: &Scene) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.commit(scene);
    }

    /// `true` when [`HistoryManager::undo`] would change the scene.
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    /// `true` when [`HistoryManager::redo`] would change the scene.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Snapshots on the undo stack, including the current state.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Snapshots available to redo.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Maximum number of snapshots on the undo stack.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The current (most recent) snapshot.
    pub fn current(&self) -> Option<&Snapshot> {
        self.undo_stack.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ObjectType;

    fn scene_with(n: usize) -> Scene {
        Scene::from_objects((0..n).map(|i| {
            SceneObject::with_defaults(ObjectType::Circle, format!("c{i}").into(), 0, 0)
        }))
    }

    #[test]
    fn single_snapshot_cannot_undo() {
        let mut scene = scene_with(1);
        let mut history = HistoryManager::new();
        history.commit(&scene);
        assert!(!history.can_undo());
        assert!(!history.undo(&mut scene));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn snapshots_are_shared_between_stacks() {
        let mut scene = scene_with(0);
        let mut history = HistoryManager::new();
        history.commit(&scene);
        history.commit(&scene_with(2));
        let top = Arc::clone(history.current().unwrap());

        assert!(history.undo(&mut scene));
        assert!(history.redo(&mut scene));
        assert!(Arc::ptr_eq(&top, history.current().unwrap()));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let history = HistoryManager::with_capacity(0);
        assert_eq!(history.capacity(), 1);
    }
}
