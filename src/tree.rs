use crate::animator::BoundsTarget;
use crate::rect::Rect;
use crate::view::{ViewId, ViewKind};
use log::trace;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Errors that may occur when mutating a view tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("no such view: {0:?}")]
    NoSuchView(ViewId),
    #[error("the root view cannot be removed")]
    RemoveRoot,
}

/// A tree of views.
///
/// Views are only ever referred to by [`ViewId`]; once a view is removed, lookups for its ID fail
/// instead of dangling.
#[derive(Debug)]
pub struct ViewTree {
    root: ViewId,
    kinds: HashMap<ViewId, ViewKind>,
    bounds: HashMap<ViewId, Rect>,
    parents: HashMap<ViewId, ViewId>,
    subviews: HashMap<ViewId, Vec<ViewId>>,
    groups: HashMap<ViewId, u32>,
    /// Views that need to be repainted.
    dirty: BTreeSet<ViewId>,
    /// Views whose subviews need to be laid out again.
    needs_layout: BTreeSet<ViewId>,
}

impl ViewTree {
    /// Creates a tree with an empty root container.
    pub fn new() -> ViewTree {
        let root = ViewId::new();
        let mut tree = ViewTree {
            root,
            kinds: HashMap::new(),
            bounds: HashMap::new(),
            parents: HashMap::new(),
            subviews: HashMap::new(),
            groups: HashMap::new(),
            dirty: BTreeSet::new(),
            needs_layout: BTreeSet::new(),
        };
        tree.insert_node(root, ViewKind::Container);
        tree
    }

    /// The root view.
    pub fn root(&self) -> ViewId {
        self.root
    }

    fn insert_node(&mut self, id: ViewId, kind: ViewKind) {
        self.kinds.insert(id, kind);
        self.bounds.insert(id, Rect::zero());
        self.subviews.insert(id, Vec::new());
        self.dirty.insert(id);
    }

    /// Adds a view as the last subview of `parent`, with zero bounds.
    pub fn add_view(&mut self, parent: ViewId, kind: ViewKind) -> Result<ViewId, TreeError> {
        if !self.contains(parent) {
            return Err(TreeError::NoSuchView(parent));
        }

        let id = ViewId::new();
        self.insert_node(id, kind);
        self.parents.insert(id, parent);
        if let Some(subviews) = self.subviews.get_mut(&parent) {
            subviews.push(id);
        }
        self.needs_layout.insert(parent);
        trace!("added {:?} to {:?}", id, parent);
        Ok(id)
    }

    /// Removes a view and all of its subviews.
    pub fn remove_view(&mut self, id: ViewId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RemoveRoot);
        }
        if !self.contains(id) {
            return Err(TreeError::NoSuchView(id));
        }

        if let Some(parent) = self.parents.get(&id).copied() {
            if let Some(subviews) = self.subviews.get_mut(&parent) {
                subviews.retain(|i| *i != id);
            }
            self.needs_layout.insert(parent);
            self.dirty.insert(parent);
        }
        self.remove_subtree(id);
        trace!("removed {:?}", id);
        Ok(())
    }

    /// Removes a view without touching its superview’s subview list.
    fn remove_subtree(&mut self, id: ViewId) {
        self.kinds.remove(&id);
        self.bounds.remove(&id);
        self.parents.remove(&id);
        self.groups.remove(&id);
        self.dirty.remove(&id);
        self.needs_layout.remove(&id);

        for id in self.subviews.remove(&id).unwrap_or_default() {
            self.remove_subtree(id);
        }
    }

    /// Removes all subviews of a view.
    pub fn clear_subviews(&mut self, id: ViewId) -> Result<(), TreeError> {
        let subviews = self
            .subviews
            .get_mut(&id)
            .map(std::mem::take)
            .ok_or(TreeError::NoSuchView(id))?;
        for subview in subviews {
            self.remove_subtree(subview);
        }
        self.needs_layout.insert(id);
        self.dirty.insert(id);
        Ok(())
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.kinds.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn kind(&self, id: ViewId) -> Option<&ViewKind> {
        self.kinds.get(&id)
    }

    /// Mutable access to a view’s kind; marks the view for repainting.
    pub fn kind_mut(&mut self, id: ViewId) -> Option<&mut ViewKind> {
        let kind = self.kinds.get_mut(&id)?;
        self.dirty.insert(id);
        Some(kind)
    }

    pub fn superview(&self, id: ViewId) -> Option<ViewId> {
        self.parents.get(&id).copied()
    }

    pub fn subviews(&self, id: ViewId) -> &[ViewId] {
        match self.subviews.get(&id) {
            Some(subviews) => subviews,
            None => &[],
        }
    }

    /// Sets the group of a view; views sharing a group belong to the same logical row.
    pub fn set_group(&mut self, id: ViewId, group: u32) -> Result<(), TreeError> {
        if !self.contains(id) {
            return Err(TreeError::NoSuchView(id));
        }
        self.groups.insert(id, group);
        Ok(())
    }

    pub fn group(&self, id: ViewId) -> Option<u32> {
        self.groups.get(&id).copied()
    }

    /// Returns whether the view’s subviews need layout.
    pub fn needs_layout(&self, id: ViewId) -> bool {
        self.needs_layout.contains(&id)
    }

    /// Returns and clears the set of views that need layout.
    pub fn take_needs_layout(&mut self) -> Vec<ViewId> {
        std::mem::take(&mut self.needs_layout).into_iter().collect()
    }

    /// Returns and clears the set of views that need to be repainted.
    pub fn take_dirty(&mut self) -> Vec<ViewId> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        ViewTree::new()
    }
}

impl BoundsTarget for ViewTree {
    fn bounds(&self, view: ViewId) -> Option<Rect> {
        self.bounds.get(&view).copied()
    }

    fn set_bounds(&mut self, view: ViewId, bounds: Rect) -> bool {
        let current = match self.bounds.get_mut(&view) {
            Some(current) => current,
            None => return false,
        };
        let resized = current.size != bounds.size;
        *current = bounds;

        self.dirty.insert(view);
        if resized {
            self.needs_layout.insert(view);
        }
        // the old and new area both belong to the superview
        if let Some(parent) = self.parents.get(&view) {
            self.dirty.insert(*parent);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str) -> ViewKind {
        ViewKind::Label { text: text.into() }
    }

    #[test]
    fn add_and_remove_subtree() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        let a = tree.add_view(root, ViewKind::Container).unwrap();
        let b = tree.add_view(a, label("b")).unwrap();
        let c = tree.add_view(root, label("c")).unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.subviews(root), &[a, c]);
        assert_eq!(tree.superview(b), Some(a));

        tree.remove_view(a).unwrap();
        assert!(!tree.contains(a));
        assert!(!tree.contains(b), "subviews should be removed with their superview");
        assert_eq!(tree.subviews(root), &[c]);
        assert_eq!(tree.remove_view(a), Err(TreeError::NoSuchView(a)));
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        assert_eq!(tree.remove_view(root), Err(TreeError::RemoveRoot));
    }

    #[test]
    fn add_to_missing_parent() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        let a = tree.add_view(root, ViewKind::Container).unwrap();
        tree.remove_view(a).unwrap();
        assert_eq!(
            tree.add_view(a, ViewKind::Container),
            Err(TreeError::NoSuchView(a))
        );
    }

    #[test]
    fn set_bounds_marks_dirty() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        let a = tree.add_view(root, label("a")).unwrap();
        tree.take_dirty();
        tree.take_needs_layout();

        assert!(tree.set_bounds(a, Rect::from_xywh(1., 2., 3., 4.)));
        assert_eq!(tree.bounds(a), Some(Rect::from_xywh(1., 2., 3., 4.)));
        let dirty = tree.take_dirty();
        assert!(dirty.contains(&a));
        assert!(dirty.contains(&root));
        assert!(tree.needs_layout(a), "a resize should request layout");

        tree.take_needs_layout();
        tree.set_bounds(a, Rect::from_xywh(5., 5., 3., 4.));
        assert!(!tree.needs_layout(a), "a move alone should not request layout");
    }

    #[test]
    fn set_bounds_on_removed_view() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        let a = tree.add_view(root, label("a")).unwrap();
        tree.remove_view(a).unwrap();
        assert!(!tree.set_bounds(a, Rect::zero()));
        assert_eq!(tree.bounds(a), None);
    }

    #[test]
    fn clear_subviews() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        let a = tree.add_view(root, ViewKind::Container).unwrap();
        let b = tree.add_view(a, label("b")).unwrap();
        tree.set_group(b, 3).unwrap();
        tree.clear_subviews(a).unwrap();
        assert!(tree.subviews(a).is_empty());
        assert!(!tree.contains(b));
        assert_eq!(tree.group(b), None);
    }
}
