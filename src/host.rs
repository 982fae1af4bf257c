use crate::animator::{AnimatorConfig, BoundsAnimator, TickReport};
use crate::events::{Event, EventHandler, EventKind, EventTable};
use crate::tick::{FrameTimer, TickSource};
use crate::tree::{TreeError, ViewTree};
use crate::view::ViewId;
use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use log::{debug, trace};
use std::time::Instant;

/// Messages understood by a host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// An input event, e.g. a button press.
    Input(Event),
    /// A frame tick at the given time.
    Tick(Instant),
    /// Stops the host.
    Quit,
}

/// Everything an event handler may touch.
///
/// Handlers may register further handlers (e.g. for views they create) through `handlers`.
#[derive(Debug)]
pub struct HostContext<T> {
    pub tree: ViewTree,
    pub animator: BoundsAnimator<T>,
    pub handlers: EventTable<HostContext<T>>,
}

impl<T: TickSource> HostContext<T> {
    /// Registers an event handler.
    pub fn on<F>(&mut self, source: ViewId, kind: EventKind, handler: F)
    where
        F: 'static + FnMut(&Event, &mut HostContext<T>) + Send,
    {
        self.handlers.subscribe(source, kind, EventHandler::new(handler));
    }

    /// Removes a view with its subviews, their handlers, and their animations.
    pub fn remove_view(&mut self, id: ViewId) -> Result<(), TreeError> {
        let mut stack = vec![id];
        let mut removed = Vec::new();
        while let Some(id) = stack.pop() {
            stack.extend_from_slice(self.tree.subviews(id));
            removed.push(id);
        }

        self.tree.remove_view(id)?;
        for id in removed {
            self.handlers.remove_view(id);
            self.animator.cancel(id);
        }
        Ok(())
    }

    /// Removes all subviews of a view, like `remove_view` does.
    pub fn clear_subviews(&mut self, id: ViewId) -> Result<(), TreeError> {
        let subviews = self.tree.subviews(id).to_vec();
        for subview in subviews {
            self.remove_view(subview)?;
        }
        Ok(())
    }

    /// Runs the handler for an event. Returns false if there is none.
    pub fn dispatch(&mut self, event: &Event) -> bool {
        // the handler is cloned out of the table so it may modify the table
        match self.handlers.handler(event.source, event.kind) {
            Some(handler) => handler.call(event, self),
            None => {
                trace!("no handler for {:?}", event);
                false
            }
        }
    }
}

/// Connects a view tree, a bounds animator and event handlers to an event queue.
///
/// Events may be sent from any thread through [`Host::sender`]; they are processed on the thread
/// that calls [`Host::poll`].
pub struct Host<T> {
    pub context: HostContext<T>,
    event_send: Sender<HostEvent>,
    event_recv: Receiver<HostEvent>,
    quit: bool,
}

impl<T: TickSource> Host<T> {
    /// Creates a new host with an empty tree.
    pub fn new(ticks: T, config: AnimatorConfig) -> Host<T> {
        let (event_send, event_recv) = channel::unbounded();

        Host {
            context: HostContext {
                tree: ViewTree::new(),
                animator: BoundsAnimator::with_config(ticks, config),
                handlers: EventTable::new(),
            },
            event_send,
            event_recv,
            quit: false,
        }
    }

    /// Returns a sender for the event queue.
    pub fn sender(&self) -> Sender<HostEvent> {
        self.event_send.clone()
    }

    /// Registers an event handler.
    pub fn on<F>(&mut self, source: ViewId, kind: EventKind, handler: F)
    where
        F: 'static + FnMut(&Event, &mut HostContext<T>) + Send,
    {
        self.context.on(source, kind, handler);
    }

    pub fn handlers(&self) -> &EventTable<HostContext<T>> {
        &self.context.handlers
    }

    /// Removes a view with its subviews, their handlers, and their animations.
    pub fn remove_view(&mut self, id: ViewId) -> Result<(), TreeError> {
        self.context.remove_view(id)
    }

    /// Receives all events from the event queue and handles them.
    ///
    /// Returns false once the host has been asked to quit.
    pub fn poll(&mut self) -> bool {
        while !self.quit {
            match self.event_recv.try_recv() {
                Ok(event) => self.handle(event),
                // we hold a sender ourselves, so this cannot really happen
                Err(TryRecvError::Disconnected) => self.quit = true,
                Err(TryRecvError::Empty) => break,
            }
        }
        !self.quit
    }

    /// Handles one event immediately, bypassing the queue.
    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Input(event) => {
                trace!("input {:?}", event);
                self.context.dispatch(&event);
            }
            HostEvent::Tick(now) => {
                let report = self.tick(now);
                trace!("tick: {:?}", report);
            }
            HostEvent::Quit => {
                debug!("host quitting");
                self.quit = true;
            }
        }
    }

    /// Advances animations to `now` and emits `AnimationEnded` for every job that ended.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let context = &mut self.context;
        let report = context.animator.on_tick(now, &mut context.tree);
        for (view, state) in &report.finished {
            context.dispatch(&Event::animation_ended(*view, *state));
        }
        report
    }

    /// Whether animations are still running.
    pub fn is_animating(&self) -> bool {
        self.context.animator.is_active()
    }
}

impl Host<FrameTimer> {
    /// Ticks the animator if a frame has elapsed since the last call.
    ///
    /// Returns the frame time that was applied, if any.
    pub fn poll_frames(&mut self) -> Option<Instant> {
        let now = self.context.animator.tick_source_mut().poll()?;
        self.tick(now);
        Some(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::{BoundsTarget, JobState};
    use crate::easing::Easing;
    use crate::rect::Rect;
    use crate::tick::ManualTicks;
    use crate::view::ViewKind;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    fn host() -> Host<ManualTicks> {
        let config = AnimatorConfig::default().with_easing(Easing::Linear);
        Host::new(ManualTicks::new(), config)
    }

    #[test]
    fn press_starts_animation_and_ticks_finish_it() {
        let mut host = host();
        let root = host.context.tree.root();
        let button = host
            .context
            .tree
            .add_view(root, ViewKind::Button { label: "Go".into() })
            .unwrap();
        let target = host.context.tree.add_view(root, ViewKind::Container).unwrap();

        host.on(button, EventKind::Pressed, move |_, ctx| {
            ctx.animator
                .animate_to(
                    &ctx.tree,
                    target,
                    Rect::from_xywh(0., 0., 40., 40.),
                    Duration::from_millis(100),
                )
                .unwrap();
        });

        let ended = Arc::new(Mutex::new(Vec::new()));
        let ended_in_handler = Arc::clone(&ended);
        host.on(target, EventKind::AnimationEnded, move |event, _| {
            ended_in_handler.lock().push(event.animation);
        });

        let start = host.context.animator.tick_source().now();
        let sender = host.sender();
        sender.send(HostEvent::Input(Event::pressed(button))).unwrap();
        sender.send(HostEvent::Tick(start + Duration::from_millis(50))).unwrap();
        assert!(host.poll());
        assert_eq!(
            host.context.tree.bounds(target),
            Some(Rect::from_xywh(0., 0., 20., 20.))
        );
        assert!(host.is_animating());

        sender.send(HostEvent::Tick(start + Duration::from_millis(100))).unwrap();
        host.poll();
        assert!(!host.is_animating());
        assert_eq!(*ended.lock(), vec![Some(JobState::Completed)]);
    }

    #[test]
    fn handlers_can_register_handlers() {
        let mut host = host();
        let root = host.context.tree.root();
        let button = host
            .context
            .tree
            .add_view(root, ViewKind::Button { label: "Add".into() })
            .unwrap();

        host.on(button, EventKind::Pressed, move |_, ctx| {
            let root = ctx.tree.root();
            let link = ctx
                .tree
                .add_view(root, ViewKind::Link { text: "new".into(), tag: 0 })
                .unwrap();
            ctx.on(link, EventKind::LinkClicked, |_, _| {});
        });

        host.handle(HostEvent::Input(Event::pressed(button)));
        host.handle(HostEvent::Input(Event::pressed(button)));
        assert_eq!(host.handlers().len(), 3);
    }

    #[test]
    fn frame_timer_drives_animations() {
        let config = AnimatorConfig::default().with_easing(Easing::Linear);
        let mut host = Host::new(FrameTimer::new(Duration::from_millis(1)), config);
        let root = host.context.tree.root();
        let view = host.context.tree.add_view(root, ViewKind::Container).unwrap();
        assert_eq!(host.poll_frames(), None);

        let destination = Rect::from_xywh(0., 0., 100., 100.);
        host.context
            .animator
            .animate_to(&host.context.tree, view, destination, Duration::from_millis(20))
            .unwrap();
        assert!(host.context.animator.tick_source().is_subscribed());

        std::thread::sleep(Duration::from_millis(5));
        assert!(host.poll_frames().is_some());
        assert_ne!(host.context.tree.bounds(view), Some(Rect::zero()));

        std::thread::sleep(Duration::from_millis(25));
        assert!(host.poll_frames().is_some());
        assert_eq!(host.context.tree.bounds(view), Some(destination));
        assert!(!host.is_animating());
        assert!(!host.context.animator.tick_source().is_subscribed());
    }

    #[test]
    fn quit_stops_polling() {
        let mut host = host();
        let sender = host.sender();
        sender.send(HostEvent::Quit).unwrap();
        assert!(!host.poll());
    }

    #[test]
    fn removing_a_view_cleans_up() {
        let mut host = host();
        let root = host.context.tree.root();
        let panel = host.context.tree.add_view(root, ViewKind::Container).unwrap();
        let link = host
            .context
            .tree
            .add_view(panel, ViewKind::Link { text: "x".into(), tag: 0 })
            .unwrap();
        host.on(link, EventKind::LinkClicked, |_, _| {});
        host.context
            .animator
            .animate_to(&host.context.tree, link, Rect::zero(), Duration::from_millis(10))
            .unwrap();

        host.remove_view(panel).unwrap();
        assert!(host.handlers().is_empty());
        assert!(!host.is_animating());
        assert_eq!(host.remove_view(panel), Err(TreeError::NoSuchView(panel)));
    }
}
