//! Global context for CLI commands

use anyhow::{Context as _, Result};
use metacode_core::config::Config;
use std::env;
use std::path::Path;

/// Configuration shared by all commands
pub struct Context {
    pub config: Config,
    pub verbose: bool,
}

impl Context {
    /// Load the config from `config_path`, or discover `metacode.toml` in the
    /// current directory
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or is invalid.
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Config::discover(env::current_dir()?)?,
        };
        log::debug!("using config: {:?}", config);

        Ok(Self { config, verbose })
    }
}
