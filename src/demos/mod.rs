//! Demo views.
//!
//! Each demo builds a small view hierarchy inside a container view and registers the event
//! handlers that drive it. They are headless: whatever displays the tree is up to the host.

pub mod anima;
pub mod bubble;
pub mod video_save;

use crate::animator::{AnimationError, BoundsTarget};
use crate::rect::Rect;
use crate::tree::{TreeError, ViewTree};
use crate::view::ViewId;
use cgmath::Point2;
use thiserror::Error;

/// Errors from demo event handlers.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DemoError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Animation(#[from] AnimationError),
}

/// Sizes a view to its preferred size, keeping its origin.
pub(crate) fn size_to_preferred(tree: &mut ViewTree, id: ViewId) -> Result<Rect, TreeError> {
    let preferred = tree
        .kind(id)
        .map(|kind| kind.preferred_size())
        .ok_or(TreeError::NoSuchView(id))?;
    let origin = tree.bounds(id).map_or(Point2::new(0., 0.), |b| b.origin);
    let bounds = Rect::new(origin, preferred);
    tree.set_bounds(id, bounds);
    Ok(bounds)
}

/// Gives every subview the full bounds of `parent`.
pub(crate) fn fill_layout(tree: &mut ViewTree, parent: ViewId) -> Result<(), TreeError> {
    let bounds = tree.bounds(parent).ok_or(TreeError::NoSuchView(parent))?;
    let inner = Rect::from_xywh(0., 0., bounds.width(), bounds.height());
    for id in tree.subviews(parent).to_vec() {
        tree.set_bounds(id, inner);
    }
    Ok(())
}

/// Lays subviews out left to right at their preferred sizes.
pub(crate) fn row_layout(tree: &mut ViewTree, parent: ViewId, spacing: f64) -> Result<(), TreeError> {
    if !tree.contains(parent) {
        return Err(TreeError::NoSuchView(parent));
    }
    let mut x = 0.;
    for id in tree.subviews(parent).to_vec() {
        let size = tree
            .kind(id)
            .map(|kind| kind.preferred_size())
            .ok_or(TreeError::NoSuchView(id))?;
        tree.set_bounds(id, Rect::from_xywh(x, 0., size.x, size.y));
        x += size.x + spacing;
    }
    Ok(())
}
