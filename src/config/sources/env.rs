//! Environment source: `DYNSCOPE_<SECTION>__<FIELD>`, e.g.
//! `DYNSCOPE_LIMITS__MAX_SCOPE_DEPTH=64`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "DYNSCOPE";

/// Add environment overrides to builder.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
