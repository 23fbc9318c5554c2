use crate::error::{CatalogError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Platform written by `ItemPatch::apply` whenever the patch leaves it out.
pub const DEFAULT_PLATFORM: &str = "Multi";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Kept as the JSON number it was read as, so `60` and `60.0` both
    /// survive a save unchanged.
    pub price: Number,
    #[serde(default = "default_quantity", deserialize_with = "quantity_or_default")]
    pub quantity: u64,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub release_date: String,
    /// Keys written by other tools, e.g. `steam_app_id`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_quantity() -> u64 {
    1
}

fn quantity_or_default<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_else(default_quantity))
}

impl Item {
    pub fn price_value(&self) -> f64 {
        self.price.as_f64().unwrap_or(0.0)
    }

    /// String form of a field for substring search. Unknown fields fall back
    /// to the extra keys, and anything missing reads as empty.
    pub fn field_text(&self, field: &str) -> String {
        match field {
            "id" => self.id.to_string(),
            "name" => self.name.clone(),
            "description" => self.description.clone(),
            "price" => self.price.to_string(),
            "quantity" => self.quantity.to_string(),
            "rating" => self.rating.to_string(),
            "platform" => self.platform.clone(),
            "genre" => self.genre.clone(),
            "category" => self.category.clone(),
            "release_date" => self.release_date.clone(),
            other => match self.extra.get(other) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(value) => value.to_string(),
            },
        }
    }
}

/// A rating as found on disk. Files edited by hand or by other tools may hold
/// a numeric string, `null`, or any other JSON value; all of them survive a
/// load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Score(Number),
    Text(String),
    Unset,
    Other(Value),
}

impl Default for Rating {
    fn default() -> Self {
        Rating::Score(Number::from(0))
    }
}

impl Rating {
    pub fn from_f64(score: f64) -> Option<Self> {
        Number::from_f64(score).map(Rating::Score)
    }

    /// Numeric value, or `None` when the stored rating is not a number.
    /// Booleans count as 1 and 0.
    pub fn value(&self) -> Option<f64> {
        match self {
            Rating::Score(score) => score.as_f64(),
            Rating::Text(text) => text.trim().parse().ok(),
            Rating::Unset => None,
            Rating::Other(Value::Bool(flag)) => Some(if *flag { 1.0 } else { 0.0 }),
            Rating::Other(_) => None,
        }
    }

    pub fn sort_key(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Score(score) => write!(f, "{}", score),
            Rating::Text(text) => f.write_str(text),
            Rating::Unset => Ok(()),
            Rating::Other(value) => write!(f, "{}", value),
        }
    }
}

/// Fields for a new catalog entry. The store assigns the id.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: Option<u64>,
    pub rating: Option<f64>,
    pub platform: String,
    pub genre: String,
    pub category: String,
    pub release_date: String,
}

impl NewItem {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            missing.push("price");
        }
        if self.quantity == Some(0) {
            missing.push("quantity");
        }
        if !missing.is_empty() {
            return Err(CatalogError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        Ok(())
    }

    pub(crate) fn into_item(self, id: u64) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
            price: Number::from_f64(self.price).unwrap_or_else(|| Number::from(0)),
            quantity: self.quantity.unwrap_or_else(default_quantity),
            rating: self.rating.and_then(Rating::from_f64).unwrap_or_default(),
            platform: self.platform,
            genre: self.genre,
            category: self.category,
            release_date: self.release_date,
            extra: Map::new(),
        }
    }
}

/// A partial update. `None` keeps the current value, except for `platform`
/// which resets to [`DEFAULT_PLATFORM`].
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u64>,
    pub rating: Option<f64>,
    pub platform: Option<String>,
    pub genre: Option<String>,
    pub category: Option<String>,
    pub release_date: Option<String>,
}

impl ItemPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(CatalogError::Validation(
                    "name must not be empty".to_string(),
                ));
            }
        }
        if let Some(price) = self.price {
            if !(price.is_finite() && price >= 0.0) {
                return Err(CatalogError::Validation(format!(
                    "price must be a non-negative number, got {}",
                    price
                )));
            }
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        Ok(())
    }

    pub fn apply(self, item: &mut Item) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(price) = self.price.and_then(Number::from_f64) {
            item.price = price;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(rating) = self.rating.and_then(Rating::from_f64) {
            item.rating = rating;
        }
        // Unlike every other field, an omitted platform is not kept.
        item.platform = self
            .platform
            .unwrap_or_else(|| DEFAULT_PLATFORM.to_string());
        if let Some(genre) = self.genre {
            item.genre = genre;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(release_date) = self.release_date {
            item.release_date = release_date;
        }
    }
}

fn validate_rating(rating: f64) -> Result<()> {
    if rating.is_finite() && (0.0..=10.0).contains(&rating) {
        Ok(())
    } else {
        Err(CatalogError::Validation(format!(
            "rating must be between 0 and 10, got {}",
            rating
        )))
    }
}
