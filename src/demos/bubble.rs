//! Bubbles that grow, fade in, or fade out when their button is pressed.
//!
//! "Fading" is done with bounds alone: a fading-in bubble grows out of a zero-area rectangle at
//! its anchor, and a fading-out bubble shrinks back into one.

use super::{row_layout, DemoError};
use crate::animator::{BoundsTarget, JobState};
use crate::color::Color;
use crate::events::{Event, EventKind};
use crate::host::HostContext;
use crate::rect::Rect;
use crate::tick::TickSource;
use crate::tree::TreeError;
use crate::view::{ViewId, ViewKind};
use cgmath::{Point2, Vector2};
use log::{debug, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Where a bubble’s arrow points from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    None,
    TopLeft,
    BottomRight,
    LeftTop,
}

/// Describes one kind of bubble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleConfig {
    pub label: &'static str,
    pub color: Color,
    pub arrow: Arrow,
    pub fade_in: bool,
    pub fade_out: bool,
}

/// One button per config, in this order.
pub fn configs() -> [BubbleConfig; 4] {
    [
        BubbleConfig {
            label: "Round",
            color: Color::from_argb(0xFFC1_B1E1),
            arrow: Arrow::None,
            fade_in: false,
            fade_out: false,
        },
        BubbleConfig {
            label: "Arrow",
            color: Color::GRAY,
            arrow: Arrow::TopLeft,
            fade_in: false,
            fade_out: false,
        },
        BubbleConfig {
            label: "FadeIn",
            color: Color::YELLOW,
            arrow: Arrow::BottomRight,
            fade_in: true,
            fade_out: false,
        },
        BubbleConfig {
            label: "FadeOut",
            color: Color::WHITE,
            arrow: Arrow::LeftTop,
            fade_in: false,
            fade_out: true,
        },
    ]
}

/// Size of a bubble.
pub const BUBBLE_SIZE: Vector2<f64> = Vector2 { x: 320., y: 240. };

/// Where non-fading bubbles grow to.
pub const GROW_TO: Rect = Rect {
    origin: Point2 { x: 10., y: 10. },
    size: Vector2 { x: 800., y: 600. },
};

pub const BUBBLE_ANIMATION: Duration = Duration::from_millis(4000);

/// Spacing between the buttons.
const BUTTON_SPACING: f64 = 1.;

#[derive(Debug, Default)]
struct BubbleState {
    /// The bubble currently on screen.
    current: Option<ViewId>,
    /// Set while the current bubble is fading out.
    fading_out: bool,
}

/// The bubble demo.
#[derive(Debug, Clone)]
pub struct BubbleDemo {
    /// Buttons, in the order of [`configs`].
    pub buttons: [ViewId; 4],
    /// Parent of the bubbles.
    pub layer: ViewId,
    state: Arc<Mutex<BubbleState>>,
}

impl BubbleDemo {
    /// Builds the buttons in `container`. Bubbles are added to `layer`, which would usually be a
    /// top-level view.
    pub fn build<T: TickSource + 'static>(
        ctx: &mut HostContext<T>,
        container: ViewId,
        layer: ViewId,
    ) -> Result<BubbleDemo, TreeError> {
        let configs = configs();
        let mut buttons = [container; 4];
        for (button, config) in buttons.iter_mut().zip(configs.iter()) {
            *button = ctx.tree.add_view(
                container,
                ViewKind::Button {
                    label: config.label.into(),
                },
            )?;
        }
        row_layout(&mut ctx.tree, container, BUTTON_SPACING)?;

        let demo = BubbleDemo {
            buttons,
            layer,
            state: Arc::new(Mutex::new(BubbleState::default())),
        };

        for (button, config) in buttons.iter().zip(configs.iter()) {
            let demo = demo.clone();
            let config = *config;
            ctx.on(*button, EventKind::Pressed, move |event, ctx| {
                if let Err(err) = demo.show_bubble(ctx, event.source, config) {
                    warn!("bubble: {}", err);
                }
            });
        }

        Ok(demo)
    }

    /// The bubble currently on screen.
    pub fn current(&self) -> Option<ViewId> {
        self.state.lock().current
    }

    /// Shows a new bubble anchored to `anchor`. The previous bubble stops animating but stays
    /// open.
    pub fn show_bubble<T: TickSource + 'static>(
        &self,
        ctx: &mut HostContext<T>,
        anchor: ViewId,
        config: BubbleConfig,
    ) -> Result<ViewId, DemoError> {
        let mut state = self.state.lock();
        if let Some(previous) = state.current.take() {
            // the old bubble stays open, frozen wherever its animation got to
            if ctx.animator.cancel(previous) {
                debug!("stopped animating bubble {:?}", previous);
            }
        }
        state.fading_out = false;

        let anchor_bounds = ctx
            .tree
            .bounds(anchor)
            .ok_or(TreeError::NoSuchView(anchor))?;
        let bubble = ctx.tree.add_view(
            self.layer,
            ViewKind::Bubble {
                color: config.color,
                anchor: Some(anchor),
            },
        )?;
        let label = ctx.tree.add_view(
            bubble,
            ViewKind::Label {
                text: config.label.into(),
            },
        )?;
        ctx.tree
            .set_bounds(label, Rect::new(Point2::new(0., 0.), BUBBLE_SIZE));
        state.current = Some(bubble);

        // bubbles hang off the bottom left corner of their anchor
        let anchor_point = Point2::new(anchor_bounds.x(), anchor_bounds.y() + anchor_bounds.height());
        let shown = Rect::new(anchor_point, BUBBLE_SIZE);
        let hidden = Rect::new(anchor_point, Vector2::new(0., 0.));

        if config.fade_in {
            ctx.tree.set_bounds(bubble, hidden);
            ctx.animator
                .animate_to(&ctx.tree, bubble, shown, BUBBLE_ANIMATION)?;
        } else {
            ctx.tree.set_bounds(bubble, shown);
            ctx.animator
                .animate_to(&ctx.tree, bubble, GROW_TO, BUBBLE_ANIMATION)?;
        }

        if config.fade_out {
            // replaces the job above, starting from where the bubble is now
            ctx.animator
                .animate_to(&ctx.tree, bubble, hidden, BUBBLE_ANIMATION)?;
            state.fading_out = true;

            let demo = self.clone();
            ctx.on(bubble, EventKind::AnimationEnded, move |event, ctx| {
                demo.faded_out(ctx, event);
            });
        }

        Ok(bubble)
    }

    /// Closes the bubble once it has faded out.
    fn faded_out<T: TickSource>(&self, ctx: &mut HostContext<T>, event: &Event) {
        let mut state = self.state.lock();
        if state.current != Some(event.source) || !state.fading_out {
            return;
        }
        if event.animation == Some(JobState::Completed) {
            debug!("bubble {:?} faded out", event.source);
            state.current = None;
            state.fading_out = false;
            let _ = ctx.remove_view(event.source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::AnimatorConfig;
    use crate::easing::Easing;
    use crate::host::{Host, HostEvent};
    use crate::tick::ManualTicks;

    fn setup() -> (Host<ManualTicks>, BubbleDemo) {
        let config = AnimatorConfig::default().with_easing(Easing::Linear);
        let mut host = Host::new(ManualTicks::new(), config);
        let root = host.context.tree.root();
        let container = host.context.tree.add_view(root, ViewKind::Container).unwrap();
        let layer = host.context.tree.add_view(root, ViewKind::Container).unwrap();
        let demo = BubbleDemo::build(&mut host.context, container, layer).unwrap();
        (host, demo)
    }

    fn press(host: &mut Host<ManualTicks>, button: ViewId) {
        host.handle(HostEvent::Input(Event::pressed(button)));
    }

    #[test]
    fn buttons_are_laid_out_in_a_row() {
        let (host, demo) = setup();
        let round = host.context.tree.bounds(demo.buttons[0]).unwrap();
        let arrow = host.context.tree.bounds(demo.buttons[1]).unwrap();
        assert_eq!(round.x(), 0.);
        assert_eq!(arrow.x(), round.width() + BUTTON_SPACING);
    }

    #[test]
    fn round_bubble_grows() {
        let (mut host, demo) = setup();
        let start = host.context.animator.tick_source().now();
        press(&mut host, demo.buttons[0]);

        let bubble = demo.current().unwrap();
        let anchor = host.context.tree.bounds(demo.buttons[0]).unwrap();
        assert_eq!(
            host.context.animator.job(bubble).map(|job| job.start_bounds()),
            Some(Rect::new(
                Point2::new(anchor.x(), anchor.height()),
                BUBBLE_SIZE
            ))
        );

        host.handle(HostEvent::Tick(start + BUBBLE_ANIMATION));
        assert_eq!(host.context.tree.bounds(bubble), Some(GROW_TO));
    }

    #[test]
    fn fade_in_starts_from_nothing() {
        let (mut host, demo) = setup();
        let start = host.context.animator.tick_source().now();
        press(&mut host, demo.buttons[2]);

        let bubble = demo.current().unwrap();
        host.handle(HostEvent::Tick(start));
        assert!(host.context.tree.bounds(bubble).unwrap().is_empty());

        host.handle(HostEvent::Tick(start + BUBBLE_ANIMATION / 2));
        assert_eq!(
            host.context.tree.bounds(bubble).map(|b| b.size),
            Some(BUBBLE_SIZE / 2.)
        );

        host.handle(HostEvent::Tick(start + BUBBLE_ANIMATION));
        assert_eq!(host.context.tree.bounds(bubble).map(|b| b.size), Some(BUBBLE_SIZE));
    }

    #[test]
    fn fade_out_closes_bubble() {
        let (mut host, demo) = setup();
        let start = host.context.animator.tick_source().now();
        press(&mut host, demo.buttons[3]);
        let bubble = demo.current().unwrap();
        assert_eq!(host.context.animator.job_count(), 1);

        host.handle(HostEvent::Tick(start + BUBBLE_ANIMATION));
        assert_eq!(demo.current(), None);
        assert!(!host.context.tree.contains(bubble));
        assert!(host.handlers().handler(bubble, EventKind::AnimationEnded).is_none());
    }

    #[test]
    fn new_press_stops_previous_bubble() {
        let (mut host, demo) = setup();
        let start = host.context.animator.tick_source().now();
        press(&mut host, demo.buttons[0]);
        let first = demo.current().unwrap();
        press(&mut host, demo.buttons[1]);
        let second = demo.current().unwrap();

        assert_ne!(first, second);
        assert!(host.context.tree.contains(first));
        assert!(!host.context.animator.is_animating(first));
        assert!(host.context.animator.is_animating(second));
        assert_eq!(host.context.tree.subviews(demo.layer), &[first, second]);

        // the first bubble stays where it was when the second one appeared
        let frozen = host.context.tree.bounds(first);
        host.handle(HostEvent::Tick(start + BUBBLE_ANIMATION));
        assert_eq!(host.context.tree.bounds(first), frozen);
        assert_eq!(host.context.tree.bounds(second), Some(GROW_TO));
    }
}
