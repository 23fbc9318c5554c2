use crate::domain::storage::Storage;
use crate::domain::{CatalogSnapshot, Item, ItemPatch, NewItem};
use crate::error::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The in-memory catalog and its JSON mirror.
///
/// The collection in memory is authoritative for the lifetime of the store.
/// Every mutation rewrites the full snapshot through [`Storage`]; if that
/// write fails the error is returned and the in-memory change is kept, so the
/// next successful mutation brings the file back in sync.
///
/// Mutations take `&mut self`. A server handling requests concurrently has to
/// put the whole store behind one `Mutex` and hold it for each call.
pub struct CatalogStore {
    store: Arc<dyn Storage>,
    items: Vec<Item>,
    next_id: u64,
}

impl CatalogStore {
    pub fn open(store: Arc<dyn Storage + 'static>) -> Result<Self> {
        let items = match store.load_catalog()? {
            Some(snapshot) => snapshot.into_items(),
            None => {
                info!("No catalog snapshot found, starting with an empty catalog");
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id) {
                warn!("Catalog snapshot contains duplicate id {}", item.id);
            }
        }

        let next_id = items.iter().map(|item| item.id).max().map_or(1, |id| id + 1);
        info!("Loaded {} catalog items, next id {}", items.len(), next_id);

        Ok(Self {
            store,
            items,
            next_id,
        })
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in collection order, which is insertion order.
    pub(crate) fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn add(&mut self, new_item: NewItem) -> Result<Item> {
        new_item.validate()?;

        let item = new_item.into_item(self.next_id);
        self.next_id += 1;
        self.items.push(item.clone());
        info!("Added item {} ({})", item.id, item.name);

        self.persist()?;
        Ok(item)
    }

    pub fn get(&self, id: u64) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Case-insensitive exact match on the name, first hit wins.
    pub fn get_by_name(&self, name: &str) -> Option<&Item> {
        let name = name.to_lowercase();
        self.items
            .iter()
            .find(|item| item.name.to_lowercase() == name)
    }

    /// Every item, sorted by name ignoring case.
    pub fn list_all(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.iter().collect();
        items.sort_by_cached_key(|item| item.name.to_lowercase());
        items
    }

    /// Applies `patch` to the item with `id`. Returns `Ok(None)` if there is
    /// no such item, in which case nothing is written.
    pub fn update(&mut self, id: u64, patch: ItemPatch) -> Result<Option<Item>> {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            debug!("Update skipped, no item {}", id);
            return Ok(None);
        };
        patch.validate()?;
        patch.apply(item);
        let updated = item.clone();
        info!("Updated item {} ({})", updated.id, updated.name);

        self.persist()?;
        Ok(Some(updated))
    }

    pub fn update_quantity(&mut self, id: u64, quantity: u64) -> Result<Option<Item>> {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };
        item.quantity = quantity;
        let updated = item.clone();
        info!("Set quantity of item {} to {}", id, quantity);

        self.persist()?;
        Ok(Some(updated))
    }

    /// Removes the item with `id` and rewrites the snapshot either way.
    pub fn delete(&mut self, id: u64) -> Result<Option<Item>> {
        let removed = self
            .items
            .iter()
            .position(|item| item.id == id)
            .map(|index| self.items.remove(index));

        match &removed {
            Some(item) => info!("Deleted item {} ({})", item.id, item.name),
            None => debug!("Delete found no item {}", id),
        }

        self.persist()?;
        Ok(removed)
    }

    fn persist(&self) -> Result<()> {
        self.store
            .save_catalog(&CatalogSnapshot::borrowed(&self.items))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{Rating, DEFAULT_PLATFORM};
    use crate::error::CatalogError;
    use crate::infrastructure::FileSystemStore;
    use serde_json::{json, Value};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    pub(crate) fn open_store(dir: &TempDir) -> CatalogStore {
        CatalogStore::open(Arc::new(FileSystemStore::new(dir.path()))).unwrap()
    }

    pub(crate) fn game(name: &str, price: f64) -> NewItem {
        NewItem {
            quantity: Some(5),
            ..NewItem::new(name, price)
        }
    }

    fn catalog_file(dir: &TempDir) -> PathBuf {
        dir.path().join("catalog_data.json")
    }

    fn read_file(dir: &TempDir) -> Value {
        serde_json::from_str(&fs::read_to_string(catalog_file(dir)).unwrap()).unwrap()
    }

    #[test]
    fn test_open_without_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
        assert!(!catalog_file(&dir).exists());
    }

    #[test]
    fn test_add_then_get_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let added = store
            .add(NewItem {
                description: "Metroidvania".into(),
                rating: Some(9.1),
                platform: "Switch".into(),
                ..game("Hollow Knight", 14.99)
            })
            .unwrap();

        assert_eq!(added.id, 1);
        assert_eq!(store.get(added.id), Some(&added));
        assert_eq!(read_file(&dir)["catalog"][0]["name"], "Hollow Knight");
    }

    #[test]
    fn test_add_defaults_quantity() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let added = store.add(NewItem::new("Tetris", 4.99)).unwrap();
        assert_eq!(added.quantity, 1);
    }

    #[test]
    fn test_add_rejects_invalid_item_without_consuming_id() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let err = store.add(NewItem::new("Free Game", 0.0)).unwrap_err();

        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        store.add(game("Doom", 4.99)).unwrap();
        let second = store.add(game("Quake", 4.99)).unwrap();
        store.delete(second.id).unwrap();

        let third = store.add(game("Heretic", 4.99)).unwrap();
        assert_eq!(third.id, 3);
        assert_eq!(store.next_id(), 4);
    }

    #[test]
    fn test_list_all_sorts_by_name_ignoring_case() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        store.add(game("zelda", 59.99)).unwrap();
        store.add(game("Adventure", 2.99)).unwrap();

        let names: Vec<&str> = store.list_all().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Adventure", "zelda"]);
    }

    #[test]
    fn test_get_by_name_ignores_case() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let added = store.add(game("Stardew Valley", 14.99)).unwrap();

        assert_eq!(store.get_by_name("stardew valley"), Some(&added));
        assert_eq!(store.get_by_name("stardew"), None);
    }

    #[test]
    fn test_empty_update_resets_platform_only() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let added = store
            .add(NewItem {
                platform: "PC".into(),
                genre: "Strategy".into(),
                rating: Some(8.0),
                ..game("Civilization VI", 59.99)
            })
            .unwrap();

        let updated = store.update(added.id, ItemPatch::default()).unwrap().unwrap();

        assert_eq!(updated.platform, DEFAULT_PLATFORM);
        assert_eq!(updated.name, added.name);
        assert_eq!(updated.genre, added.genre);
        assert_eq!(updated.price, added.price);
        assert_eq!(updated.quantity, added.quantity);
        assert_eq!(updated.rating, added.rating);
        assert_eq!(read_file(&dir)["catalog"][0]["platform"], "Multi");
    }

    #[test]
    fn test_update_applies_present_fields() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let added = store.add(game("Celeste", 19.99)).unwrap();

        let patch = ItemPatch {
            price: Some(9.99),
            platform: Some("Switch".into()),
            ..Default::default()
        };
        let updated = store.update(added.id, patch).unwrap().unwrap();

        assert_eq!(updated.price_value(), 9.99);
        assert_eq!(updated.platform, "Switch");
        assert_eq!(store.get(added.id), Some(&updated));
    }

    #[test]
    fn test_update_unknown_id_is_none() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        assert_eq!(store.update(42, ItemPatch::default()).unwrap(), None);
        assert_eq!(store.update_quantity(42, 3).unwrap(), None);
        assert!(!catalog_file(&dir).exists());
    }

    #[test]
    fn test_invalid_update_of_unknown_id_is_none() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let patch = ItemPatch {
            rating: Some(42.0),
            ..Default::default()
        };
        assert_eq!(store.update(7, patch).unwrap(), None);
    }

    #[test]
    fn test_update_rejects_empty_name() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let added = store.add(game("Celeste", 19.99)).unwrap();

        let patch = ItemPatch {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(
            store.update(added.id, patch),
            Err(CatalogError::Validation(_))
        ));
        assert_eq!(store.get(added.id).unwrap().name, "Celeste");
    }

    #[test]
    fn test_update_quantity_persists() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let added = store.add(game("Portal 2", 9.99)).unwrap();

        let updated = store.update_quantity(added.id, 0).unwrap().unwrap();

        assert_eq!(updated.quantity, 0);
        assert_eq!(read_file(&dir)["catalog"][0]["quantity"], 0);
    }

    #[test]
    fn test_delete_removes_item_from_memory_and_file() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let keep = store.add(game("Braid", 9.99)).unwrap();
        let gone = store.add(game("Fez", 9.99)).unwrap();

        let removed = store.delete(gone.id).unwrap();

        assert_eq!(removed, Some(gone.clone()));
        assert_eq!(store.get(gone.id), None);
        let ids: Vec<u64> = read_file(&dir)["catalog"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![keep.id]);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add(game("Braid", 9.99)).unwrap();

        assert_eq!(store.delete(99).unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_open_backfills_quantity_and_computes_next_id() {
        let dir = TempDir::new().unwrap();
        fs::write(
            catalog_file(&dir),
            json!({
                "catalog": [
                    { "id": 7, "name": "Okami", "price": 19.99, "rating": 9.0 },
                    { "id": 3, "name": "Ico", "price": 9.99, "quantity": 2 }
                ]
            })
            .to_string(),
        )
        .unwrap();

        let store = open_store(&dir);

        assert_eq!(store.next_id(), 8);
        assert_eq!(store.get(7).unwrap().quantity, 1);
        assert_eq!(store.get(3).unwrap().quantity, 2);
        assert_eq!(store.get(3).unwrap().rating, Rating::default());
    }

    #[test]
    fn test_unknown_keys_survive_mutation() {
        let dir = TempDir::new().unwrap();
        fs::write(
            catalog_file(&dir),
            json!({
                "catalog": [
                    { "id": 1, "name": "Hades", "price": 24.99, "steam_app_id": 1145360 }
                ]
            })
            .to_string(),
        )
        .unwrap();

        let mut store = open_store(&dir);
        store.update_quantity(1, 10).unwrap();

        let written = read_file(&dir);
        assert_eq!(written["catalog"][0]["steam_app_id"], 1145360);
        assert_eq!(written["catalog"][0]["quantity"], 10);
    }

    #[test]
    fn test_search_price_matches_written_number_form() {
        let dir = TempDir::new().unwrap();
        fs::write(
            catalog_file(&dir),
            json!({
                "catalog": [
                    { "id": 1, "name": "Ori", "price": 60.0, "rating": 9.0 },
                    { "id": 2, "name": "Gris", "price": 60, "rating": 9 }
                ]
            })
            .to_string(),
        )
        .unwrap();
        let mut store = open_store(&dir);

        let found: Vec<u64> = store.search("60.0", "price").iter().map(|i| i.id).collect();
        assert_eq!(found, vec![1]);

        store.update_quantity(2, 3).unwrap();
        let raw = fs::read_to_string(catalog_file(&dir)).unwrap();
        assert!(raw.contains("\"price\": 60.0,"), "{}", raw);
        assert!(raw.contains("\"price\": 60,"), "{}", raw);
        assert!(raw.contains("\"rating\": 9,"), "{}", raw);
    }

    #[test]
    fn test_open_tolerates_odd_records() {
        let dir = TempDir::new().unwrap();
        fs::write(
            catalog_file(&dir),
            json!({
                "catalog": [
                    { "id": 1, "name": "Rez", "price": 9.99, "rating": true, "quantity": null },
                    { "id": 2, "name": "Lumines", "price": 9.99, "rating": { "stars": 4 } }
                ]
            })
            .to_string(),
        )
        .unwrap();

        let store = open_store(&dir);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().quantity, 1);
        let rated: Vec<u64> = store.search("1", "rating").iter().map(|i| i.id).collect();
        assert_eq!(rated, vec![1]);
    }

    #[test]
    fn test_reopen_sees_persisted_state() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = open_store(&dir);
            store.add(game("Inside", 19.99)).unwrap();
            store.add(game("Limbo", 9.99)).unwrap();
        }

        let store = open_store(&dir);
        assert_eq!(store.len(), 2);
        assert_eq!(store.next_id(), 3);
        assert_eq!(store.get(2).unwrap().name, "Limbo");
    }
}
