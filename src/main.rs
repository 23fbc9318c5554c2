use crate::config::Config;
use crate::error::Result;
use crate::infrastructure::FileSystemStore;
use crate::services::CatalogStore;
use std::sync::Arc;
use tracing::debug;

mod commands;
mod config;
mod domain;
mod error;
mod infrastructure;
mod services;

fn main() -> Result<()> {
    let config = Config::new()?;
    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .with_writer(std::io::stderr)
        .init();

    config.ensure_directories()?;

    let store = Arc::new(FileSystemStore::new(&config.args.data_dir));
    let mut catalog = CatalogStore::open(store)?;
    debug!(
        "Catalog holds {} items, next id {}",
        catalog.len(),
        catalog.next_id()
    );

    let command = config.args.command;
    debug!("Running {:?}", command);
    commands::run(command, &mut catalog, &mut std::io::stdout().lock())
}
