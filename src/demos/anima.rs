//! A button that moves a box around.

use super::{fill_layout, size_to_preferred};
use crate::animator::{AnimationError, BoundsTarget};
use crate::color::Color;
use crate::events::EventKind;
use crate::host::HostContext;
use crate::rect::Rect;
use crate::tick::TickSource;
use crate::tree::{TreeError, ViewTree};
use crate::view::{ViewId, ViewKind};
use cgmath::{Point2, Vector2};
use log::warn;
use std::time::Duration;

/// Preferred size of the animated box.
pub const BOX_SIZE: Vector2<f64> = Vector2 { x: 30., y: 20. };

/// Where the "Move" button sends the box.
pub const MOVE_TARGET: Rect = Rect {
    origin: Point2 { x: 300., y: 300. },
    size: Vector2 { x: 100., y: 100. },
};

pub const MOVE_DURATION: Duration = Duration::from_millis(1000);

/// Height of the box as laid out.
const BOX_HEIGHT: f64 = 30.;

/// View IDs of the anima demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimaDemo {
    /// Fills the container; hosts the box.
    pub view: ViewId,
    pub moving_box: ViewId,
    pub button: ViewId,
}

impl AnimaDemo {
    /// Builds the demo in `container` and registers its handlers.
    pub fn build<T: TickSource + 'static>(
        ctx: &mut HostContext<T>,
        container: ViewId,
    ) -> Result<AnimaDemo, TreeError> {
        let view = ctx.tree.add_view(container, ViewKind::Container)?;
        let moving_box = ctx.tree.add_view(
            view,
            ViewKind::Fill {
                color: Color::rgb(100. / 255., 1., 100. / 255.),
                preferred: BOX_SIZE,
            },
        )?;
        let button = ctx.tree.add_view(
            container,
            ViewKind::Button {
                label: "Move".into(),
            },
        )?;

        let demo = AnimaDemo {
            view,
            moving_box,
            button,
        };
        demo.layout(&mut ctx.tree)?;

        ctx.on(button, EventKind::Pressed, move |_, ctx| {
            if let Err(err) = demo.move_box(ctx, MOVE_TARGET) {
                warn!("anima: {}", err);
            }
        });

        Ok(demo)
    }

    /// Lays out the demo after its container was resized.
    ///
    /// The box spans the width of the view minus 100 points, 100 points from the top. Its
    /// preferred size is ignored.
    pub fn layout(&self, tree: &mut ViewTree) -> Result<(), TreeError> {
        let container = tree
            .superview(self.view)
            .ok_or(TreeError::NoSuchView(self.view))?;
        fill_layout(tree, container)?;
        size_to_preferred(tree, self.button)?;

        let bounds = tree.bounds(self.view).ok_or(TreeError::NoSuchView(self.view))?;
        let width = (bounds.width() - 100.).max(0.);
        tree.set_bounds(self.moving_box, Rect::from_xywh(10., 100., width, BOX_HEIGHT));
        Ok(())
    }

    /// Starts moving the box to `destination`.
    pub fn move_box<T: TickSource>(
        &self,
        ctx: &mut HostContext<T>,
        destination: Rect,
    ) -> Result<(), AnimationError> {
        ctx.animator
            .animate_to(&ctx.tree, self.moving_box, destination, MOVE_DURATION)
    }
}
