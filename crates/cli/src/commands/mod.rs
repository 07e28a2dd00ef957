//! Command implementations.

mod info;
mod run;
mod validate;

pub use info::run_info;
pub use run::run_pipeline;
pub use validate::run_validate;

use std::path::{Path, PathBuf};

use config_loader::ConfigLoader;
use contracts::ConverterBlueprint;
use tracing::{debug, info};

use crate::error::{CliError, Result};

/// Picked up from the working directory when no `--config` is given
const DEFAULT_CONFIG_FILE: &str = "sensor-merge.toml";

/// Load the blueprint from an explicit path, the default file, or built-in defaults
fn load_blueprint(config: Option<&Path>) -> Result<(ConverterBlueprint, Option<PathBuf>)> {
    let path = match config {
        Some(path) if !path.exists() => return Err(CliError::config_not_found(path)),
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };

    match path {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            let blueprint = ConfigLoader::load_from_path(&path)?;
            Ok((blueprint, Some(path)))
        }
        None => {
            debug!("No configuration file, using built-in defaults");
            Ok((ConverterBlueprint::default(), None))
        }
    }
}
