use super::catalog::CatalogStore;
use super::rating::RatingRange;
use crate::domain::Item;
use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

pub const DEFAULT_SEARCH_FIELD: &str = "name";

/// Conjunctive filter; `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Prefix of the release date, usually a year.
    pub release_year: Option<String>,
    /// Items whose rating is not a number never pass this.
    pub min_rating: Option<f64>,
}

impl Criteria {
    pub fn matches(&self, item: &Item) -> bool {
        self.name
            .as_ref()
            .map_or(true, |name| {
                item.name.to_lowercase().contains(&name.to_lowercase())
            })
            && self
                .category
                .as_ref()
                .map_or(true, |category| &item.category == category)
            && self.min_price.map_or(true, |min| item.price_value() >= min)
            && self.max_price.map_or(true, |max| item.price_value() <= max)
            && self
                .release_year
                .as_ref()
                .map_or(true, |year| item.release_date.starts_with(year.as_str()))
            && self.min_rating.map_or(true, |min| {
                item.rating.value().is_some_and(|rating| rating >= min)
            })
    }
}

impl CatalogStore {
    /// Searches one field. `rating` is a minimum-rating threshold; any other
    /// field is a case-insensitive substring match. Results are name-sorted.
    pub fn search(&self, query: &str, field: &str) -> Vec<&Item> {
        if field == "rating" {
            let Ok(threshold) = query.trim().parse::<f64>() else {
                debug!("Rating threshold '{}' is not a number", query);
                return Vec::new();
            };
            return self
                .list_all()
                .into_iter()
                .filter(|item| item.rating.value().is_some_and(|r| r >= threshold))
                .collect();
        }

        let query = query.to_lowercase();
        self.list_all()
            .into_iter()
            .filter(|item| item.field_text(field).to_lowercase().contains(&query))
            .collect()
    }

    /// Name or description contains `query`, ignoring case.
    pub fn search_text(&self, query: &str) -> Vec<&Item> {
        if query.is_empty() {
            return Vec::new();
        }
        let query = query.to_lowercase();
        self.list_all()
            .into_iter()
            .filter(|item| {
                item.name.to_lowercase().contains(&query)
                    || item.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Items whose rating falls in the range described by `input`, in
    /// collection order. Input that does not describe a range matches nothing.
    pub fn search_by_rating_range(&self, input: &str) -> Vec<&Item> {
        let range: RatingRange = match input.parse() {
            Ok(range) => range,
            Err(e) => {
                warn!("Ignoring rating range '{}': {}", input, e);
                return Vec::new();
            }
        };

        let results: Vec<&Item> = self
            .items()
            .iter()
            .filter(|item| match item.rating.value() {
                Some(rating) => {
                    trace!("Checking item {} with rating {}", item.name, rating);
                    range.contains(rating)
                }
                None => false,
            })
            .collect();

        debug!(
            "Found {} of {} items with rating between {} and {}",
            results.len(),
            self.len(),
            range.min,
            range.max
        );
        results
    }

    pub fn by_platform(&self, platform: &str) -> Vec<&Item> {
        self.filter(|item| item.platform == platform)
    }

    pub fn by_genre(&self, genre: &str) -> Vec<&Item> {
        self.filter(|item| item.genre == genre)
    }

    pub fn by_category(&self, category: &str) -> Vec<&Item> {
        self.filter(|item| item.category == category)
    }

    /// Release date starts with `year`. Results are name-sorted.
    pub fn by_release_year(&self, year: &str) -> Vec<&Item> {
        self.list_all()
            .into_iter()
            .filter(|item| item.release_date.starts_with(year))
            .collect()
    }

    pub fn by_price_range(&self, min_price: f64, max_price: f64) -> Vec<&Item> {
        self.filter(|item| {
            let price = item.price_value();
            min_price <= price && price <= max_price
        })
    }

    pub fn by_criteria(&self, criteria: &Criteria) -> Vec<&Item> {
        self.filter(|item| criteria.matches(item))
    }

    pub fn sorted_by_price(&self, ascending: bool) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items().iter().collect();
        if ascending {
            items.sort_by(|a, b| a.price_value().total_cmp(&b.price_value()));
        } else {
            items.sort_by(|a, b| b.price_value().total_cmp(&a.price_value()));
        }
        items
    }

    pub fn sorted_by_rating(&self, ascending: bool) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items().iter().collect();
        if ascending {
            items.sort_by(|a, b| a.rating.sort_key().total_cmp(&b.rating.sort_key()));
        } else {
            items.sort_by(|a, b| b.rating.sort_key().total_cmp(&a.rating.sort_key()));
        }
        items
    }

    pub fn categories(&self) -> Vec<&str> {
        distinct(self.items().iter().map(|item| item.category.as_str()))
    }

    pub fn genres(&self) -> Vec<&str> {
        distinct(self.items().iter().map(|item| item.genre.as_str()))
    }

    fn filter(&self, predicate: impl Fn(&Item) -> bool) -> Vec<&Item> {
        self.items().iter().filter(|&item| predicate(item)).collect()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    values
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
