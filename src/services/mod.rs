pub(crate) mod catalog;
mod query;
pub(crate) mod rating;

pub use catalog::CatalogStore;
pub use query::{Criteria, DEFAULT_SEARCH_FIELD};
