//! Turns user intents into outbound channel frames.
//!
//! Fire-and-forget: nothing is queued, retried or acknowledged, and no error reaches the
//! caller. The store converges when the authority echoes the change back as a notification.

use time::OffsetDateTime;

use crate::channel::{ClientFrame, ConnectionManager};
use crate::model::{Item, ItemDraft, palette};

/// Outbound seam. A stricter transport with delivery guarantees can slot in here without
/// touching the reconciler.
pub trait MutationSink {
    /// Returns whether the frame was handed to a transport.
    fn submit(&self, frame: ClientFrame) -> bool;
}

impl MutationSink for ConnectionManager {
    fn submit(&self, frame: ClientFrame) -> bool {
        self.send(frame)
    }
}

pub struct Dispatcher<'a, S: MutationSink + ?Sized> {
    sink: &'a S,
}

impl<'a, S: MutationSink + ?Sized> Dispatcher<'a, S> {
    pub fn new(sink: &'a S) -> Self {
        Self { sink }
    }

    /// `item-add`. A color is picked from the palette if the draft has none.
    pub fn request_add(&self, mut draft: ItemDraft) -> bool {
        if draft.color.is_empty() {
            draft.color = palette::random_color().to_string();
        }
        self.sink.submit(ClientFrame::ItemAdd(draft))
    }

    /// `item-update` with the item as given.
    pub fn request_update(&self, item: &Item) -> bool {
        self.sink.submit(ClientFrame::ItemUpdate(item.clone()))
    }

    /// Tombstones `item` in place, then sends it as `item-update`.
    pub fn request_trash(&self, item: &mut Item) -> bool {
        self.request_trash_at(item, OffsetDateTime::now_utc())
    }

    pub fn request_trash_at(&self, item: &mut Item, now: OffsetDateTime) -> bool {
        item.tombstone(now);
        self.request_update(item)
    }

    /// Clears the tombstone in place, then sends it as `item-update`.
    pub fn request_restore(&self, item: &mut Item) -> bool {
        item.revive();
        self.request_update(item)
    }

    /// `item-del`. The local copy stays until the authority confirms with `remove-item`.
    pub fn request_hard_delete(&self, item: &Item) -> bool {
        self.sink.submit(ClientFrame::ItemDel(item.clone()))
    }
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
