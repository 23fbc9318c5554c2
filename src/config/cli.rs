use crate::services::DEFAULT_SEARCH_FIELD;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Directory holding catalog_data.json
    #[arg(long, env = "CATALOG_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every item, sorted by name
    List,
    /// Show one item
    Get { id: u64 },
    /// Look an item up by its exact name, ignoring case
    Find { name: String },
    /// Add a new item
    Add(AddArgs),
    /// Change fields of an item. An omitted --platform resets it to "Multi"
    Update {
        id: u64,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Set the stock count of an item
    SetQuantity { id: u64, quantity: u64 },
    /// Remove an item
    Delete { id: u64 },
    /// Search one field; `--field rating` treats the query as a minimum rating
    Search {
        query: String,
        #[arg(long, default_value = DEFAULT_SEARCH_FIELD)]
        field: String,
    },
    /// Search names and descriptions
    TextSearch { query: String },
    /// Items rated within "min-max" or around a single rating, e.g. "4" or "2-4"
    RatingRange { range: String },
    /// Items on exactly this platform
    Platform { platform: String },
    /// Items of exactly this genre
    Genre { genre: String },
    /// Items in exactly this category
    Category { category: String },
    /// Items whose release date starts with this year
    Released { year: String },
    /// Items priced between min and max, inclusive
    PriceRange { min: f64, max: f64 },
    /// Items matching every given filter
    Criteria {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        /// Release date prefix, e.g. 2017
        #[arg(long)]
        release_year: Option<String>,
        #[arg(long)]
        min_rating: Option<f64>,
    },
    /// All items by price, cheapest first unless --desc
    SortByPrice {
        #[arg(long)]
        desc: bool,
    },
    /// All items by rating, best first unless --asc
    SortByRating {
        #[arg(long)]
        asc: bool,
    },
    /// Distinct categories in use
    Categories,
    /// Distinct genres in use
    Genres,
}

#[derive(ClapArgs, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub price: f64,
    #[arg(long)]
    pub quantity: Option<u64>,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub rating: Option<f64>,
    #[arg(long, default_value = "")]
    pub platform: String,
    #[arg(long, default_value = "")]
    pub genre: String,
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long, default_value = "")]
    pub release_date: String,
}

#[derive(ClapArgs, Debug)]
pub struct UpdateArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub quantity: Option<u64>,
    #[arg(long)]
    pub rating: Option<f64>,
    #[arg(long)]
    pub platform: Option<String>,
    #[arg(long)]
    pub genre: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub release_date: Option<String>,
}
