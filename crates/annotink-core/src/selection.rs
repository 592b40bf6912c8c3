//! The set of currently targeted shapes.
//!
//! Every entry point takes a membership predicate supplied by the owner, so
//! the selection can only ever reference shapes that are live in the
//! collection. Non-member ids are filtered out and ignored, never an error:
//! gestures race against deletions and must stay robust.

use crate::shapes::ShapeId;

/// Ordered-irrelevant set of shape ids targeted by edit operations.
///
/// Mutators return `true` when the content actually changed; the owner turns
/// that into at most one outward selection notification. Replacing the
/// selection with identical content reports no change.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    ids: Vec<ShapeId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn has(&self, id: &ShapeId) -> bool {
        self.ids.contains(id)
    }

    /// Selected ids, in the order they entered the selection.
    pub fn ids(&self) -> &[ShapeId] {
        &self.ids
    }

    /// Replace the entire selection. Ids failing the membership predicate
    /// are dropped; duplicates collapse to the first occurrence.
    pub fn replace(&mut self, ids: Vec<ShapeId>, is_member: impl Fn(&ShapeId) -> bool) -> bool {
        let mut next: Vec<ShapeId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !is_member(&id) {
                log::debug!("selection: ignoring non-member shape {id}");
                continue;
            }
            if !next.contains(&id) {
                next.push(id);
            }
        }
        if same_content(&next, &self.ids) {
            return false;
        }
        self.ids = next;
        true
    }

    /// Toggle one id's membership.
    pub fn toggle(&mut self, id: ShapeId, is_member: impl Fn(&ShapeId) -> bool) -> bool {
        if let Some(index) = self.ids.iter().position(|candidate| *candidate == id) {
            self.ids.remove(index);
            return true;
        }
        if !is_member(&id) {
            log::debug!("selection: ignoring non-member shape {id}");
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Drop one id if present. Used when its shape leaves the collection.
    pub fn remove(&mut self, id: &ShapeId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|candidate| candidate != id);
        self.ids.len() != before
    }

    /// Empty the selection. Returns `false` when already empty.
    pub fn clear(&mut self) -> bool {
        if self.ids.is_empty() {
            return false;
        }
        self.ids.clear();
        true
    }
}

/// Set equality regardless of order.
fn same_content(a: &[ShapeId], b: &[ShapeId]) -> bool {
    a.len() == b.len() && a.iter().all(|id| b.contains(id))
}
