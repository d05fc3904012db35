//! Config file source: an explicit TOML path supplied by the host.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;
use tracing::warn;

/// Add the config file at `path` to the builder.
/// A missing file is not an error; the remaining sources still apply.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.exists() {
        warn!(
            config_path = %path.display(),
            "Configuration file not found; using defaults and environment"
        );
        return Ok(builder);
    }
    Ok(builder.add_source(File::from(path).required(false)))
}
