//! Events.
//!
//! Handlers are registered per `(source view, event kind)` pair in an [`EventTable`]; there is no
//! listener hierarchy. A handler that wants to react to several sources is simply registered
//! several times (it is cheap to clone).

use crate::animator::JobState;
use crate::view::ViewId;
use core::fmt;
use log::warn;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// List of event kinds.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    /// A button was pressed.
    Pressed = 0,
    /// A link was clicked.
    LinkClicked = 1,
    /// A bounds animation of the source view ended.
    AnimationEnded = 2,
}

impl EventKind {
    // smallest and largest values in Ord
    pub(crate) const MIN: Self = EventKind::Pressed;
    pub(crate) const MAX: Self = EventKind::AnimationEnded;
}

/// Modifier key state at the time of an event.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFlags {
    /// Whether any shift key is pressed.
    pub shift: bool,

    /// Whether any control key is pressed.
    pub control: bool,

    /// Whether any option key or alt key is pressed.
    pub option: bool,

    /// Whether any command key or meta key is pressed.
    pub command: bool,
}

/// An event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// The view that emitted the event.
    pub source: ViewId,
    pub kind: EventKind,
    pub flags: EventFlags,
    /// For `AnimationEnded`: how the animation ended.
    pub animation: Option<JobState>,
}

impl Event {
    pub fn new(source: ViewId, kind: EventKind) -> Event {
        Event {
            source,
            kind,
            flags: EventFlags::default(),
            animation: None,
        }
    }

    pub fn pressed(source: ViewId) -> Event {
        Event::new(source, EventKind::Pressed)
    }

    pub fn link_clicked(source: ViewId, flags: EventFlags) -> Event {
        Event {
            flags,
            ..Event::new(source, EventKind::LinkClicked)
        }
    }

    pub fn animation_ended(source: ViewId, state: JobState) -> Event {
        Event {
            animation: Some(state),
            ..Event::new(source, EventKind::AnimationEnded)
        }
    }
}

/// An event handler; receives the event and a mutable context.
pub struct EventHandler<Ctx>(Arc<Mutex<dyn FnMut(&Event, &mut Ctx) + Send>>);

impl<Ctx> Clone for EventHandler<Ctx> {
    fn clone(&self) -> Self {
        EventHandler(Arc::clone(&self.0))
    }
}

impl<Ctx> EventHandler<Ctx> {
    pub fn new<F: 'static + FnMut(&Event, &mut Ctx) + Send>(handler: F) -> Self {
        EventHandler(Arc::new(Mutex::new(handler)))
    }

    /// Runs the handler. Returns false without running it if it is already running, i.e. when
    /// a handler re-dispatches an event to itself.
    pub fn call(&self, event: &Event, ctx: &mut Ctx) -> bool {
        match self.0.try_lock() {
            Some(mut handler) => {
                (&mut *handler)(event, ctx);
                true
            }
            None => {
                warn!("skipping re-entrant event handler for {:?}", event);
                false
            }
        }
    }
}

impl<Ctx> fmt::Debug for EventHandler<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EventHandler")
    }
}

/// Refers to a single event handler.
pub(crate) type HandlerId = (ViewId, EventKind);

/// List of event handlers.
pub struct EventTable<Ctx> {
    map: BTreeMap<HandlerId, EventHandler<Ctx>>,
}

// without a `Ctx: Debug` bound, since contexts may contain their own handler table
impl<Ctx> fmt::Debug for EventTable<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.map.iter()).finish()
    }
}

impl<Ctx> EventTable<Ctx> {
    pub fn new() -> EventTable<Ctx> {
        EventTable {
            map: BTreeMap::new(),
        }
    }

    /// Sets the handler for events of a kind from a source; replaces any existing one.
    pub fn subscribe(&mut self, source: ViewId, kind: EventKind, handler: EventHandler<Ctx>) {
        self.map.insert((source, kind), handler);
    }

    pub fn unsubscribe(&mut self, source: ViewId, kind: EventKind) -> bool {
        self.map.remove(&(source, kind)).is_some()
    }

    /// Removes all handlers of a view.
    pub fn remove_view(&mut self, view: ViewId) {
        let keys_to_remove: Vec<_> = self
            .map
            .range((view, EventKind::MIN)..=(view, EventKind::MAX))
            .map(|(k, _)| *k)
            .collect();
        for key in keys_to_remove {
            self.map.remove(&key);
        }
    }

    pub fn handler(&self, source: ViewId, kind: EventKind) -> Option<EventHandler<Ctx>> {
        self.map.get(&(source, kind)).cloned()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Runs the handler registered for the event, if any. Returns true if one ran.
    pub fn dispatch(&self, event: &Event, ctx: &mut Ctx) -> bool {
        match self.map.get(&(event.source, event.kind)) {
            Some(handler) => handler.call(event, ctx),
            None => false,
        }
    }
}

impl<Ctx> Default for EventTable<Ctx> {
    fn default() -> Self {
        EventTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_by_source_and_kind() {
        let a = ViewId::new();
        let b = ViewId::new();
        let mut table = EventTable::<Vec<(ViewId, EventKind)>>::new();
        let record = EventHandler::new(|event: &Event, log: &mut Vec<(ViewId, EventKind)>| {
            log.push((event.source, event.kind))
        });
        table.subscribe(a, EventKind::Pressed, record.clone());
        table.subscribe(b, EventKind::LinkClicked, record);

        let mut log = Vec::new();
        assert!(table.dispatch(&Event::pressed(a), &mut log));
        assert!(!table.dispatch(&Event::pressed(b), &mut log));
        assert!(table.dispatch(&Event::link_clicked(b, EventFlags::default()), &mut log));
        assert_eq!(
            log,
            vec![(a, EventKind::Pressed), (b, EventKind::LinkClicked)]
        );
    }

    #[test]
    fn remove_view_drops_all_kinds() {
        let a = ViewId::new();
        let b = ViewId::new();
        let mut table = EventTable::<()>::new();
        for kind in &[EventKind::Pressed, EventKind::LinkClicked, EventKind::AnimationEnded] {
            table.subscribe(a, *kind, EventHandler::new(|_: &Event, _: &mut ()| {}));
        }
        table.subscribe(b, EventKind::Pressed, EventHandler::new(|_: &Event, _: &mut ()| {}));

        table.remove_view(a);
        assert_eq!(table.len(), 1);
        assert!(table.handler(b, EventKind::Pressed).is_some());
    }

    #[test]
    fn reentrant_call_is_skipped() {
        let a = ViewId::new();
        let slot: Arc<Mutex<Option<EventHandler<Vec<bool>>>>> = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&slot);
        let handler = EventHandler::new(move |event: &Event, ran: &mut Vec<bool>| {
            let this = inner.lock().clone();
            if let Some(this) = this {
                let nested = this.call(event, ran);
                ran.push(nested);
            }
        });
        *slot.lock() = Some(handler.clone());

        let mut ran = Vec::new();
        assert!(handler.call(&Event::pressed(a), &mut ran));
        assert_eq!(ran, vec![false]);
    }

    #[test]
    fn handlers_keep_state() {
        let a = ViewId::new();
        let mut table = EventTable::<u32>::new();
        let mut presses = 0;
        table.subscribe(
            a,
            EventKind::Pressed,
            EventHandler::new(move |_: &Event, total: &mut u32| {
                presses += 1;
                *total = presses;
            }),
        );

        let mut total = 0;
        table.dispatch(&Event::pressed(a), &mut total);
        table.dispatch(&Event::pressed(a), &mut total);
        assert_eq!(total, 2);
        assert!(table.unsubscribe(a, EventKind::Pressed));
        assert!(table.is_empty());
    }
}
