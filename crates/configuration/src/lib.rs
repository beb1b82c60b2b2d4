use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DatabaseSettings, LoggingSettings};
pub use telemetry::init_tracing;

/// Prefix for environment overrides, e.g. `HITUNES__DATABASE__MAX_CONNECTIONS=10`.
const ENV_PREFIX: &str = "HITUNES";

/// Loads the application configuration.
///
/// Sources, lowest precedence first:
/// 1. built-in defaults,
/// 2. the TOML file at `path`, or an optional `config.toml` in the working directory,
/// 3. `HITUNES__*` environment variables,
/// 4. `DATABASE_URL`, which overrides `database.url`.
///
/// The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("config").required(false),
    };

    let mut builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    if let Ok(url) = std::env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }

    let config = builder.build()?.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        max_connections = config.database.max_connections,
        acquire_timeout_secs = config.database.acquire_timeout_secs,
        "Configuration loaded."
    );

    Ok(config)
}

/// Parses configuration from a TOML string only, without consulting the
/// environment. Useful for tests and embedded defaults.
pub fn config_from_toml(source: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(source, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}
