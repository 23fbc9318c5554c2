use crate::error::{CatalogError, Result};
use std::str::FromStr;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

// "4" covers 3.5 through 4.49.
const WINDOW_BELOW: f64 = 0.5;
const WINDOW_ABOVE: f64 = 0.49;

/// Inclusive rating interval resolved from user text, either `min-max` or a
/// single center value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingRange {
    pub min: f64,
    pub max: f64,
}

impl RatingRange {
    /// Explicit bounds, swapped when reversed and clamped to the rating scale.
    pub fn between(a: f64, b: f64) -> Self {
        let (min, max) = if a > b { (b, a) } else { (a, b) };
        Self {
            min: min.max(MIN_RATING),
            max: max.min(MAX_RATING),
        }
    }

    pub fn around(center: f64) -> Result<Self> {
        if !(MIN_RATING..=MAX_RATING).contains(&center) {
            return Err(CatalogError::Parse(format!(
                "Rating {} out of valid range {}-{}",
                center, MIN_RATING, MAX_RATING
            )));
        }
        Ok(Self {
            min: (center - WINDOW_BELOW).max(MIN_RATING),
            max: (center + WINDOW_ABOVE).min(MAX_RATING),
        })
    }

    pub fn contains(&self, rating: f64) -> bool {
        self.min <= rating && rating <= self.max
    }
}

impl FromStr for RatingRange {
    type Err = CatalogError;

    fn from_str(input: &str) -> Result<Self> {
        match input.split_once('-') {
            Some((low, high)) => {
                if high.contains('-') {
                    return Err(CatalogError::Parse(format!(
                        "Expected a single 'min-max' pair, got '{}'",
                        input
                    )));
                }
                Ok(Self::between(parse_rating(low)?, parse_rating(high)?))
            }
            None => Self::around(parse_rating(input)?),
        }
    }
}

/// Infinite bounds are accepted and end up clamped; NaN is not a rating.
fn parse_rating(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
        .ok_or_else(|| CatalogError::Parse(format!("'{}' is not a valid rating", text)))
}
