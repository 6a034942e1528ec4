mod draft;
mod ids;
mod item;
pub mod palette;

pub use self::draft::{DraftError, ItemDraft};
pub use self::ids::ItemId;
pub use self::item::{Item, ItemRef};
