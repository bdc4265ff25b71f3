//! Per-invocation state shared by the CLI commands.

use tracing::debug;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::model::FitOptions;
use crate::storage::Database;

#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub db: Database,
    pub json: bool,
    pub quiet: bool,
}

impl AppContext {
    /// Load config (with `--db` applied on top) and open the database.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let mut config = Config::load(cli.config.as_deref(), &cwd)?;
        if let Some(path) = &cli.db {
            config.database.path.clone_from(path);
        }
        debug!(db = %config.database.path.display(), "opening database");
        let db = Database::open(&config.database.path)?;
        Ok(Self {
            config,
            db,
            json: cli.json,
            quiet: cli.quiet,
        })
    }

    /// Training options from config, with optional command-line overrides.
    /// Progress output is silenced in quiet and JSON modes.
    #[must_use]
    pub fn fit_options(&self, epochs: Option<u32>, batch_size: Option<usize>) -> FitOptions {
        let mut options = self.config.training.fit_options();
        if let Some(epochs) = epochs {
            options.epochs = epochs;
        }
        if let Some(batch_size) = batch_size {
            options.batch_size = batch_size;
        }
        if self.quiet || self.json {
            options.verbosity = 0;
        }
        options
    }
}
