//! Config loader: assembles defaults, file and environment sources.

use super::merge::merge_policy;
use super::sources::{env, file};
use super::EngineConfig;
use config::ConfigError;
use std::path::Path;
use tracing::debug;

/// Loads [`EngineConfig`] from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then `path` if given, then `DYNSCOPE_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        if let Some(path) = path {
            builder = file::add_to_builder(builder, path)?;
        }
        builder = env::add_to_builder(builder);

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        debug!(
            max_scope_depth = config.limits.max_scope_depth,
            log_level = %config.logging.level,
            "Loaded engine configuration"
        );
        Ok(config)
    }

    /// Defaults plus a single file; the environment is not consulted.
    pub fn load_from_file(path: &Path) -> Result<EngineConfig, ConfigError> {
        let builder = file::add_to_builder(merge_policy::builder_with_defaults()?, path)?;
        builder.build()?.try_deserialize()
    }
}
