mod item;
mod snapshot;
pub(crate) mod storage;

pub use item::{Item, ItemPatch, NewItem, Rating, DEFAULT_PLATFORM};
pub use snapshot::CatalogSnapshot;
