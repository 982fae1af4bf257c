//! Animated view bounds.
//!
//! A [`BoundsAnimator`] moves views of a [`ViewTree`] from their current bounds to a destination
//! over time, driven by a [`TickSource`](tick::TickSource). A [`Host`] ties a tree, an animator
//! and event handlers to an event queue.

pub mod animator;
pub mod color;
pub mod demos;
pub mod easing;
pub mod events;
mod host;
mod rect;
pub mod tick;
mod tree;
pub mod view;

pub use animator::{BoundsAnimator, BoundsTarget, SharedAnimator};
pub use host::{Host, HostContext, HostEvent};
pub use rect::Rect;
pub use tree::{TreeError, ViewTree};
pub use view::{ViewId, ViewKind};
