//! Client-visible ordering of a collection and the drag gesture that edits it.
//!
//! `OrderedList` is the in-memory copy a manager works on. Array position is
//! authoritative: `order_index` values coming from storage are not checked
//! for contiguity until [`OrderedList::renumber`] rewrites them.

use uuid::Uuid;

use super::collection::{EntityPatch, Ranked};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderedList<E> {
    items: Vec<E>,
}

impl<E> Default for OrderedList<E> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<E: Ranked> OrderedList<E> {
    /// Initialise from a storage snapshot, keeping its sequence as-is.
    pub fn new(snapshot: Vec<E>) -> Self {
        Self { items: snapshot }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn into_items(self) -> Vec<E> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.items.iter().map(Ranked::id).collect()
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn get(&self, id: Uuid) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Move `dragged` to the slot `target` occupied before the move.
    ///
    /// Returns `false` and leaves the list untouched when both ids are equal
    /// or either one is not in the list.
    pub fn reorder(&mut self, dragged: Uuid, target: Uuid) -> bool {
        if dragged == target {
            return false;
        }
        let (Some(from), Some(to)) = (self.position(dragged), self.position(target)) else {
            return false;
        };

        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }

    /// Merge a partial update into the matching entry without moving it.
    pub fn patch<P>(&mut self, id: Uuid, patch: &P) -> bool
    where
        P: EntityPatch<E>,
    {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                patch.apply(item);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Option<E> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    pub fn append(&mut self, entity: E) {
        self.items.push(entity);
    }

    /// Ordinal for an entity appended at the end. Never collides with an
    /// existing rank, even when earlier deletes left gaps.
    pub fn next_order_index(&self) -> i32 {
        self.items
            .iter()
            .map(E::order_index)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }

    /// Rewrite every `order_index` to its one-based position.
    pub fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            let rank = i32::try_from(index + 1).unwrap_or(i32::MAX);
            item.set_order_index(rank);
        }
    }
}

/// Browser drop-effect hint returned to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    None,
    Move,
}

/// A completed gesture: `dragged` was released over `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropIntent {
    pub dragged: Uuid,
    pub target: Uuid,
}

/// `Idle -> Dragging(id) -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging(Uuid),
}

impl DragSession {
    pub fn drag_start(&mut self, id: Uuid) -> DropEffect {
        *self = DragSession::Dragging(id);
        DropEffect::Move
    }

    pub fn drag_over(&self) -> DropEffect {
        match self {
            DragSession::Idle => DropEffect::None,
            DragSession::Dragging(_) => DropEffect::Move,
        }
    }

    /// Release over `target`. The session is always back to `Idle` afterwards.
    pub fn drop_on(&mut self, target: Uuid) -> Option<DropIntent> {
        let previous = std::mem::take(self);
        match previous {
            DragSession::Dragging(dragged) if dragged != target => {
                Some(DropIntent { dragged, target })
            }
            _ => None,
        }
    }

    /// Abandon the gesture (escape key, release outside any target).
    pub fn drag_end(&mut self) {
        *self = DragSession::Idle;
    }

    pub fn dragging(&self) -> Option<Uuid> {
        match self {
            DragSession::Idle => None,
            DragSession::Dragging(id) => Some(*id),
        }
    }
}
