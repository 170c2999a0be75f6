//! Environment variable source: ORGANISA__* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "ORGANISA";

/// Add environment variable overlay to builder.
///
/// `ORGANISA__LIMITS__MAX_FILE_BYTES=1000` sets `limits.max_file_bytes`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
