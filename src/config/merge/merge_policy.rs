//! Merge rules: defaults, override order, conflict handling.

use crate::config::DEFAULT_MAX_SCOPE_DEPTH;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("limits.max_scope_depth", DEFAULT_MAX_SCOPE_DEPTH as i64)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
