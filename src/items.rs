//! Ordered, identifier-keyed collection of items held by the engine.
//!
//! Lookups are linear scans; lists are small and insertion order is what the active view
//! shows.

use crate::model::{Item, ItemId};

mod trash;

pub use self::trash::{MS_PER_DAY, days_since_deletion};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemStore {
    items: Vec<Item>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        let mut store = Self::new();
        store.replace_all(items);
        store
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| &i.id == id)
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| &i.id == id)
    }

    /// Appends at the end of the insertion order, without checking for an existing id.
    pub fn append(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Replaces the element with the same id in place. Returns false (and does nothing)
    /// when no such element exists.
    pub fn replace(&mut self, item: Item) -> bool {
        match self.position(&item.id) {
            Some(idx) => {
                self.items[idx] = item;
                true
            }
            None => false,
        }
    }

    /// Removes every element with this id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.id != id);
        self.items.len() != before
    }

    /// Swaps in a new authoritative baseline.
    pub fn replace_all(&mut self, items: Vec<Item>) {
        self.items = items.into_iter().map(Item::normalized).collect();
    }

    fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|i| &i.id == id)
    }
}

#[cfg(test)]
#[path = "tests/items/store_tests.rs"]
mod tests;
