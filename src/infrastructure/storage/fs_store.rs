use crate::domain::storage::{Storage, StorageKeys};
use crate::domain::CatalogSnapshot;
use crate::error::{CatalogError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Clone)]
pub struct FileSystemStore {
    data_dir: PathBuf,
}

impl FileSystemStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn get_path_for_key(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| CatalogError::Persistence {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Writes the whole document to a sibling temp file, then renames it over
    /// the target. The temp file is removed if either step fails.
    fn write_json_file<T: serde::Serialize + ?Sized>(&self, key: &str, data: &T) -> Result<()> {
        self.ensure_dir(&self.data_dir)?;

        let path = self.get_path_for_key(key);
        let tmp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(data)?;

        fs::write(&tmp_path, content)
            .and_then(|_| fs::rename(&tmp_path, &path))
            .map_err(|source| {
                if tmp_path.exists() {
                    if let Err(e) = fs::remove_file(&tmp_path) {
                        warn!("Could not remove {:?}: {}", tmp_path, e);
                    }
                }
                CatalogError::Persistence {
                    path: path.clone(),
                    source,
                }
            })?;

        debug!("Wrote {:?}", path);
        Ok(())
    }

    fn read_json_file<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.get_path_for_key(key);
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(Some(serde_json::from_str(&content)?))
        } else {
            Ok(None)
        }
    }
}

impl Storage for FileSystemStore {
    fn load_catalog(&self) -> Result<Option<CatalogSnapshot<'static>>> {
        self.read_json_file(StorageKeys::CATALOG)
    }

    fn save_catalog(&self, snapshot: &CatalogSnapshot<'_>) -> Result<()> {
        self.write_json_file(StorageKeys::CATALOG, snapshot)
    }
}
