//! Applies item notifications from the channel to the local store.
//!
//! Handlers run in arrival order with no reordering or coalescing. Concurrent edits of one
//! item settle on whichever notification arrived last.

use crate::channel::ChannelEvent;
use crate::items::ItemStore;
use crate::model::{Item, ItemId};

#[derive(Clone, Copy, Debug)]
pub struct Reconciler {
    dedupe_created: bool,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self {
            dedupe_created: true,
        }
    }
}

impl Reconciler {
    pub fn new(dedupe_created: bool) -> Self {
        Self { dedupe_created }
    }

    /// `new-item`: appends. With de-duplication on, an item whose id is already present
    /// replaces the existing entry instead of adding a second one.
    pub fn on_created(&self, store: &mut ItemStore, item: Item) -> bool {
        let item = item.normalized();
        if self.dedupe_created && store.contains(&item.id) {
            tracing::debug!(id = %item.id, "new-item for known id; replacing");
            return store.replace(item);
        }
        store.append(item);
        true
    }

    /// `update-item`: replaces by id. Unknown ids are dropped, never inserted.
    pub fn on_updated(&self, store: &mut ItemStore, item: Item) -> bool {
        let id = item.id.clone();
        let applied = store.replace(item.normalized());
        if !applied {
            tracing::debug!(%id, "update-item for unknown id; dropped");
        }
        applied
    }

    /// `remove-item`: removes by id. Unknown ids are a no-op.
    pub fn on_removed(&self, store: &mut ItemStore, id: &ItemId) -> bool {
        store.remove(id)
    }

    /// Routes an item notification to its handler. Lifecycle events are ignored.
    pub fn apply(&self, store: &mut ItemStore, event: ChannelEvent) -> bool {
        match event {
            ChannelEvent::NewItem(item) => self.on_created(store, item),
            ChannelEvent::UpdateItem(item) => self.on_updated(store, item),
            ChannelEvent::RemoveItem(item) => self.on_removed(store, &item.id),
            _ => false,
        }
    }

    /// Left fold of `events` over `snapshot`.
    pub fn replay<I>(&self, snapshot: Vec<Item>, events: I) -> ItemStore
    where
        I: IntoIterator<Item = ChannelEvent>,
    {
        let mut store = ItemStore::from_items(snapshot);
        for event in events {
            self.apply(&mut store, event);
        }
        store
    }
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
