pub mod config;
pub mod run;

use std::path::Path;

use rooti_core::Config;

/// Config from `--config`, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}
