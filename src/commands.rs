use crate::config::cli::{AddArgs, Command, UpdateArgs};
use crate::domain::{ItemPatch, NewItem};
use crate::error::{CatalogError, Result};
use crate::services::{CatalogStore, Criteria};
use serde::Serialize;
use std::io::Write;

impl From<AddArgs> for NewItem {
    fn from(args: AddArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            price: args.price,
            quantity: args.quantity,
            rating: args.rating,
            platform: args.platform,
            genre: args.genre,
            category: args.category,
            release_date: args.release_date,
        }
    }
}

impl From<UpdateArgs> for ItemPatch {
    fn from(args: UpdateArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            price: args.price,
            quantity: args.quantity,
            rating: args.rating,
            platform: args.platform,
            genre: args.genre,
            category: args.category,
            release_date: args.release_date,
        }
    }
}

/// Runs one command against the store and writes the result as JSON.
pub fn run(command: Command, store: &mut CatalogStore, out: &mut impl Write) -> Result<()> {
    match command {
        Command::List => emit(out, &store.list_all()),
        Command::Get { id } => emit(out, &found(store.get(id), id)?),
        Command::Find { name } => {
            let item = store
                .get_by_name(&name)
                .ok_or_else(|| CatalogError::NotFound(format!("item named '{}'", name)))?;
            emit(out, item)
        }
        Command::Add(args) => emit(out, &store.add(args.into())?),
        Command::Update { id, fields } => {
            let updated = store.update(id, fields.into())?;
            emit(out, &found(updated, id)?)
        }
        Command::SetQuantity { id, quantity } => {
            let updated = store.update_quantity(id, quantity)?;
            emit(out, &found(updated, id)?)
        }
        Command::Delete { id } => {
            // The store treats unknown ids as a no-op; the CLI reports them.
            found(store.get(id), id)?;
            let removed = store.delete(id)?;
            emit(out, &removed)
        }
        Command::Search { query, field } => emit(out, &store.search(&query, &field)),
        Command::TextSearch { query } => emit(out, &store.search_text(&query)),
        Command::RatingRange { range } => emit(out, &store.search_by_rating_range(&range)),
        Command::Platform { platform } => emit(out, &store.by_platform(&platform)),
        Command::Genre { genre } => emit(out, &store.by_genre(&genre)),
        Command::Category { category } => emit(out, &store.by_category(&category)),
        Command::Released { year } => emit(out, &store.by_release_year(&year)),
        Command::PriceRange { min, max } => emit(out, &store.by_price_range(min, max)),
        Command::Criteria {
            name,
            category,
            min_price,
            max_price,
            release_year,
            min_rating,
        } => {
            let criteria = Criteria {
                name,
                category,
                min_price,
                max_price,
                release_year,
                min_rating,
            };
            emit(out, &store.by_criteria(&criteria))
        }
        Command::SortByPrice { desc } => emit(out, &store.sorted_by_price(!desc)),
        Command::SortByRating { asc } => emit(out, &store.sorted_by_rating(asc)),
        Command::Categories => emit(out, &store.categories()),
        Command::Genres => emit(out, &store.genres()),
    }
}

fn found<T>(item: Option<T>, id: u64) -> Result<T> {
    item.ok_or_else(|| CatalogError::NotFound(format!("item {}", id)))
}

fn emit<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::tests::{game, open_store};
    use serde_json::Value;
    use tempfile::TempDir;

    fn run_json(command: Command, store: &mut CatalogStore) -> Result<Value> {
        let mut out = Vec::new();
        run(command, store, &mut out)?;
        Ok(serde_json::from_slice(&out).unwrap())
    }

    #[test]
    fn test_get_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let err = run_json(Command::Get { id: 5 }, &mut store).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn test_delete_unknown_id_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        assert!(run_json(Command::Delete { id: 1 }, &mut store).is_err());
        assert!(!dir.path().join("catalog_data.json").exists());
    }

    #[test]
    fn test_add_then_list() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add(game("Zork", 1.99)).unwrap();

        let command = Command::Add(AddArgs {
            name: "Anno 1800".into(),
            price: 49.99,
            quantity: None,
            description: String::new(),
            rating: Some(8.0),
            platform: "PC".into(),
            genre: String::new(),
            category: String::new(),
            release_date: String::new(),
        });
        let added = run_json(command, &mut store).unwrap();
        assert_eq!(added["id"], 2);
        assert_eq!(added["quantity"], 1);

        let listed = run_json(Command::List, &mut store).unwrap();
        let names: Vec<&str> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Anno 1800", "Zork"]);
    }

    #[test]
    fn test_rating_range_with_bad_input_prints_empty_list() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add(game("Zork", 1.99)).unwrap();

        let result = run_json(
            Command::RatingRange {
                range: "high".into(),
            },
            &mut store,
        )
        .unwrap();
        assert_eq!(result, serde_json::json!([]));
    }
}
