use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::ids::ItemId;

/// One entry of the shared list, as the authority sends it.
///
/// Field names follow the server's JSON (`_id`, `isDeleted`, `deletedAt`). Older servers
/// spelled the tombstone timestamp `dateDeleted`; it is accepted on input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: ItemId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub count: u32,

    #[serde(default)]
    pub color: String,

    /// Base64 image, usually a `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub is_deleted: bool,

    #[serde(
        default,
        alias = "dateDeleted",
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_at: Option<OffsetDateTime>,
}

impl Item {
    /// Marks the item as trashed at `at`.
    pub fn tombstone(&mut self, at: OffsetDateTime) {
        self.is_deleted = true;
        self.deleted_at = Some(at);
    }

    /// Clears both tombstone fields.
    pub fn revive(&mut self) {
        self.is_deleted = false;
        self.deleted_at = None;
    }

    /// Drops a stray `deletedAt` on a live item so the store never holds one.
    pub fn normalized(mut self) -> Self {
        if !self.is_deleted {
            self.deleted_at = None;
        }
        self
    }
}

/// Identifier-only view of an item, used where the rest of the payload is not significant
/// (`remove-item`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    #[serde(rename = "_id")]
    pub id: ItemId,
}

impl From<&Item> for ItemRef {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
        }
    }
}
