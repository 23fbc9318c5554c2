use super::CatalogSnapshot;
use crate::error::Result;

pub trait Storage: Send + Sync {
    fn load_catalog(&self) -> Result<Option<CatalogSnapshot<'static>>>;
    fn save_catalog(&self, snapshot: &CatalogSnapshot<'_>) -> Result<()>;
}

pub struct StorageKeys;

impl StorageKeys {
    pub const CATALOG: &'static str = "catalog_data";
}
