//! Observable, id-keyed shape storage.
//!
//! [`ObservableContainer`] keeps items in a hash map for O(1) lookup plus an
//! insertion-order vector that gives cyclic navigation a stable iteration
//! order. Structural changes are queued during each mutation and dispatched
//! to observers only after the mutation has fully applied, so no observer
//! ever sees a half-updated container.

use crate::shapes::ShapeId;
use std::collections::HashMap;
use std::fmt;

/// Items stored in an [`ObservableContainer`] expose a stable id.
pub trait Identified {
    fn id(&self) -> &ShapeId;
}

impl Identified for crate::shapes::Shape {
    fn id(&self) -> &ShapeId {
        &self.id
    }
}

/// A structural change, as seen by container observers.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerEvent<T> {
    /// An item was added. With an existing id this is an overwrite
    /// (last-write-wins, insertion-order slot preserved).
    Added(T),
    /// An item was removed.
    Removed(T),
    /// The whole content was replaced atomically. Subscribers should rebuild
    /// from scratch instead of diffing.
    Replaced(Vec<T>),
}

/// Handle returned by [`ObservableContainer::subscribe`].
pub type ObserverId = u64;

type Observer<T> = Box<dyn FnMut(&ContainerEvent<T>)>;

/// Id-keyed collection with insertion-order iteration and change
/// notification.
pub struct ObservableContainer<T> {
    items: HashMap<ShapeId, T>,
    order: Vec<ShapeId>,
    observers: Vec<(ObserverId, Observer<T>)>,
    pending: Vec<ContainerEvent<T>>,
    next_observer: ObserverId,
}

impl<T> fmt::Debug for ObservableContainer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableContainer")
            .field("len", &self.items.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<T> Default for ObservableContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObservableContainer<T> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
            observers: Vec::new(),
            pending: Vec::new(),
            next_observer: 0,
        }
    }

    /// Register an observer. Observers are invoked in subscription order.
    pub fn subscribe(&mut self, observer: impl FnMut(&ContainerEvent<T>) + 'static) -> ObserverId {
        let id = self.next_observer;
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Unknown ids are ignored, so calling twice is safe.
    pub fn unsubscribe(&mut self, id: ObserverId) {
        self.observers.retain(|(observer_id, _)| *observer_id != id);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has(&self, id: &ShapeId) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &ShapeId) -> Option<&T> {
        self.items.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &ShapeId) -> Option<&mut T> {
        self.items.get_mut(id)
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &ShapeId> {
        self.order.iter()
    }

    /// Position of an id in insertion order.
    pub fn index_of(&self, id: &ShapeId) -> Option<usize> {
        self.order.iter().position(|candidate| candidate == id)
    }

    /// Item at an insertion-order position.
    pub fn at(&self, index: usize) -> Option<&T> {
        self.order.get(index).and_then(|id| self.items.get(id))
    }
}

impl<T: Identified + Clone> ObservableContainer<T> {
    /// Add an item, emitting one `Added` event.
    ///
    /// Adding with an id that is already present overwrites the existing
    /// item (last-write-wins) while keeping its insertion-order slot.
    pub fn add(&mut self, item: T) {
        let id = item.id().clone();
        if self.items.insert(id.clone(), item.clone()).is_none() {
            self.order.push(id);
        } else {
            log::debug!("container: overwriting existing item {id}");
        }
        self.pending.push(ContainerEvent::Added(item));
        self.flush();
    }

    /// Remove an item by id, emitting one `Removed` event. Returns the
    /// removed item, or `None` if the id was not present.
    pub fn delete(&mut self, id: &ShapeId) -> Option<T> {
        let removed = self.items.remove(id)?;
        self.order.retain(|candidate| candidate != id);
        self.pending.push(ContainerEvent::Removed(removed.clone()));
        self.flush();
        Some(removed)
    }

    /// Replace the whole content atomically, emitting a single `Replaced`
    /// event. Duplicate ids in the input resolve last-write-wins.
    pub fn set(&mut self, items: Vec<T>) {
        self.items.clear();
        self.order.clear();
        for item in &items {
            let id = item.id().clone();
            if self.items.insert(id.clone(), item.clone()).is_none() {
                self.order.push(id);
            }
        }
        let snapshot: Vec<T> = self.iter().cloned().collect();
        self.pending.push(ContainerEvent::Replaced(snapshot));
        self.flush();
    }

    /// Dispatch queued events. Iterates a snapshot of the observer list;
    /// subscriptions made while dispatching take effect from the next event
    /// cycle.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let events: Vec<ContainerEvent<T>> = self.pending.drain(..).collect();
        let mut active = std::mem::take(&mut self.observers);
        for event in &events {
            for (_, observer) in active.iter_mut() {
                observer(event);
            }
        }
        active.append(&mut self.observers);
        self.observers = active;
    }
}
