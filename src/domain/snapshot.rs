use crate::domain::item::Item;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// On-disk form of the whole catalog: `{"catalog": [...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot<'a> {
    #[serde(default)]
    pub catalog: Cow<'a, [Item]>,
}

impl<'a> CatalogSnapshot<'a> {
    pub fn borrowed(items: &'a [Item]) -> Self {
        Self {
            catalog: Cow::Borrowed(items),
        }
    }

    pub fn into_items(self) -> Vec<Item> {
        self.catalog.into_owned()
    }
}
