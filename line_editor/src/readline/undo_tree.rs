// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{Debug, Formatter, Result};

/// # Undo/Redo Algorithm
///
/// The `UndoTree` is a linear chain of snapshots (oldest first) and a pointer to the
/// current one. There is no branching: redo history is thrown away on a new edit.
///
/// ## Pushing a new state ([`UndoTree::new_state`])
///
/// 1. Every snapshot newer than the current one is truncated (discards the redo chain).
/// 2. The snapshot is appended and becomes current.
///
/// ## Undoing ([`UndoTree::undo`])
///
/// Only possible when the current snapshot has an older one before it. The very first
/// snapshot of a line is the state the line started in, so it can be returned to but
/// never undone itself. The current pointer moves left and the snapshot is handed back
/// to the caller, who applies it to the buffer.
///
/// ## Redoing ([`UndoTree::redo`])
///
/// Only possible when there is a newer snapshot. The current pointer moves right and the
/// snapshot is handed back.
///
/// ## Notes
///
/// - `current_index` is [`None`] when nothing was pushed yet (the chain's root).
/// - Undo and redo on an empty chain are no-ops returning [`None`], since they are
///   reachable through ordinary key presses.
#[derive(Clone, PartialEq)]
pub struct UndoTree<T> {
    versions: Vec<T>,
    current_index: Option<usize>,
}

impl<T> Default for UndoTree<T> {
    fn default() -> Self {
        Self {
            versions: Vec::new(),
            current_index: None,
        }
    }
}

impl<T> UndoTree<T> {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Back to the root, dropping every snapshot.
    pub fn clear(&mut self) {
        self.versions.clear();
        self.current_index = None;
    }

    /// Push `state` right after the current snapshot, discarding any redo chain.
    pub fn new_state(&mut self, state: T) {
        let keep = self.current_index.map_or(0, |it| it + 1);
        self.versions.truncate(keep);
        self.versions.push(state);
        self.current_index = Some(self.versions.len() - 1);
    }

    #[must_use]
    pub fn can_undo(&self) -> bool { self.current_index.is_some_and(|it| it > 0) }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        let next = self.current_index.map_or(0, |it| it + 1);
        next < self.versions.len()
    }

    /// Moves to the previous snapshot and returns it for the caller to apply.
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        let index = self.current_index? - 1;
        self.current_index = Some(index);
        self.versions.get(index)
    }

    /// Moves to the next snapshot and returns it for the caller to apply.
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        let index = self.current_index.map_or(0, |it| it + 1);
        self.current_index = Some(index);
        self.versions.get(index)
    }

    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.current_index.and_then(|it| self.versions.get(it))
    }

    #[must_use]
    pub fn len(&self) -> usize { self.versions.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.versions.is_empty() }
}

impl<T: Debug> Debug for UndoTree<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "UndoTree[versions: {len}, current: {current:?}]",
            len = self.versions.len(),
            current = self.current()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nothing_to_undo_initially() {
        let mut tree: UndoTree<String> = UndoTree::new();
        assert!(!tree.can_undo());
        assert!(!tree.can_redo());
        assert_eq!(tree.undo(), None);
        assert_eq!(tree.redo(), None);
    }

    #[test]
    fn test_first_state_is_not_undoable() {
        let mut tree = UndoTree::new();
        tree.new_state("".to_string());
        assert!(!tree.can_undo());
        assert_eq!(tree.undo(), None);
    }

    #[test]
    fn test_undo_and_redo() {
        let mut tree = UndoTree::new();
        tree.new_state("".to_string());
        tree.new_state("a".to_string());
        assert!(tree.can_undo());

        assert_eq!(tree.undo().map(String::as_str), Some(""));
        assert!(tree.can_redo());
        assert_eq!(tree.redo().map(String::as_str), Some("a"));
        assert!(!tree.can_redo());
    }

    #[test]
    fn test_new_state_after_undo_discards_redo_chain() {
        let mut tree = UndoTree::new();
        for it in ["", "a", "ab", "abc"] {
            tree.new_state(it.to_string());
        }
        tree.undo();
        tree.undo();
        tree.new_state("aX".to_string());

        assert!(!tree.can_redo());
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.current().map(String::as_str), Some("aX"));
        assert_eq!(tree.undo().map(String::as_str), Some("a"));
    }

    #[test]
    fn test_clear() {
        let mut tree = UndoTree::new();
        tree.new_state(1);
        tree.new_state(2);
        tree.clear();
        assert!(tree.is_empty());
        assert!(!tree.can_undo());
        assert!(!tree.can_redo());
    }
}
