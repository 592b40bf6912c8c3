//! Outward notification surface.
//!
//! The engine queues events while a mutation is in flight and flushes the
//! queue once per public call, after the mutation has fully applied. That
//! gives listeners exactly one event per logical change and leaves no window
//! where a listener could observe (or trigger) a half-applied mutation.

use crate::mode::InteractionMode;
use crate::shapes::{Shape, ShapeId};
use std::collections::VecDeque;
use std::fmt;

/// Notifications delivered to host listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationEvent {
    /// A shape entered the collection, by gesture completion or paste.
    Created(Shape),
    /// Existing shapes had geometry or properties mutated.
    Updated(Vec<ShapeId>),
    /// Shapes left the collection. A multi-shape deletion carries every
    /// removed id in one event.
    Deleted(Vec<ShapeId>),
    /// The selection content changed; carries the full current selection.
    SelectionChanged(Vec<ShapeId>),
    /// The interaction mode transitioned.
    ModeChanged(InteractionMode),
}

/// Handle returned by [`EventBus::subscribe`].
pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&AnnotationEvent)>;

/// Queued, ordered event dispatch to registered listeners.
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    queue: VecDeque<AnnotationEvent>,
    next_listener: ListenerId,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            queue: VecDeque::new(),
            next_listener: 0,
        }
    }

    /// Register a listener. Listeners are invoked in subscription order.
    pub fn subscribe(&mut self, listener: impl FnMut(&AnnotationEvent) + 'static) -> ListenerId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    /// Queue an event for the next flush.
    pub fn emit(&mut self, event: AnnotationEvent) {
        log::trace!("event queued: {event:?}");
        self.queue.push_back(event);
    }

    /// Deliver every queued event to every listener, in order. Dispatch
    /// iterates a snapshot of the listener list; subscriptions made while
    /// dispatching take effect from the next flush.
    pub fn flush(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let events: Vec<AnnotationEvent> = self.queue.drain(..).collect();
        let mut active = std::mem::take(&mut self.listeners);
        for event in &events {
            for (_, listener) in active.iter_mut() {
                listener(event);
            }
        }
        active.append(&mut self.listeners);
        self.listeners = active;
    }
}
