//! Soft-delete views over the item store.

use time::OffsetDateTime;

use super::ItemStore;
use crate::model::Item;

pub const MS_PER_DAY: i128 = 86_400_000;

impl ItemStore {
    /// Live items, in insertion order.
    pub fn active_items(&self) -> Vec<&Item> {
        self.iter().filter(|i| !i.is_deleted).collect()
    }

    /// Trashed items, most recently deleted first.
    pub fn trashed_items(&self) -> Vec<&Item> {
        self.trashed_items_at(OffsetDateTime::now_utc())
    }

    /// Same as [`ItemStore::trashed_items`] with an explicit clock. A tombstone without a
    /// timestamp counts as deleted at `now`.
    pub fn trashed_items_at(&self, now: OffsetDateTime) -> Vec<&Item> {
        let mut out: Vec<&Item> = self.iter().filter(|i| i.is_deleted).collect();
        out.sort_by(|a, b| {
            let ta = a.deleted_at.unwrap_or(now);
            let tb = b.deleted_at.unwrap_or(now);
            tb.cmp(&ta)
        });
        out
    }
}

/// Whole days elapsed since the item was trashed. Never negative; a missing timestamp
/// reads as zero days.
pub fn days_since_deletion(item: &Item, now: OffsetDateTime) -> u64 {
    let Some(deleted_at) = item.deleted_at else {
        return 0;
    };
    let elapsed_ms = (now - deleted_at).whole_milliseconds();
    if elapsed_ms <= 0 {
        return 0;
    }
    (elapsed_ms / MS_PER_DAY) as u64
}

#[cfg(test)]
#[path = "../tests/items/trash_tests.rs"]
mod tests;
