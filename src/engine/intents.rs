use super::*;
use crate::dispatch::Dispatcher;
use crate::model::{ItemDraft, ItemId};

/// User intents. Each one is fire-and-forget and returns whether a frame was handed to the
/// channel; the list changes only when the authority's notification comes back.
impl Engine {
    pub fn request_add(&self, draft: ItemDraft) -> bool {
        Dispatcher::new(&self.connection).request_add(draft)
    }

    pub fn request_update(&self, item: &Item) -> bool {
        Dispatcher::new(&self.connection).request_update(item)
    }

    /// Tombstones the stored item in place and sends it. Unknown ids do nothing.
    pub fn request_trash(&mut self, id: &ItemId) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            return false;
        };
        let sent = Dispatcher::new(&self.connection).request_trash(item);
        self.revision += 1;
        sent
    }

    /// Clears the stored item's tombstone in place and sends it. Unknown ids do nothing.
    pub fn request_restore(&mut self, id: &ItemId) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            return false;
        };
        let sent = Dispatcher::new(&self.connection).request_restore(item);
        self.revision += 1;
        sent
    }

    pub fn request_hard_delete(&self, id: &ItemId) -> bool {
        let Some(item) = self.items.get(id) else {
            return false;
        };
        Dispatcher::new(&self.connection).request_hard_delete(item)
    }
}
