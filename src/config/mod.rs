use crate::config::cli::Args;
use crate::error::{CatalogError, Result};
use clap::Parser;
use tracing::{info, Level};

pub(crate) mod cli;

pub struct Config {
    pub args: Args,
}

impl Config {
    pub fn new() -> Result<Self> {
        Ok(Self {
            args: Args::parse(),
        })
    }

    pub fn log_level(&self) -> Result<Level> {
        self.args
            .log_level
            .parse()
            .map_err(|_| CatalogError::Parse(format!("Unknown log level '{}'", self.args.log_level)))
    }

    pub fn ensure_directories(&self) -> Result<()> {
        if !self.args.data_dir.exists() {
            std::fs::create_dir_all(&self.args.data_dir)?;
        }

        info!("Using catalog data dir {:?}", self.args.data_dir);
        Ok(())
    }
}
