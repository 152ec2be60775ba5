use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "ARRSHIM_";

/// Load the TOML config at `path`, then apply `ARRSHIM_` environment
/// overrides on top.
///
/// The variable name after the prefix is `SECTION__KEY`, so
/// `ARRSHIM_ENGINE__API_KEY` sets `engine.api_key` and
/// `ARRSHIM_CATEGORIES__DEFAULT_CATEGORY` sets `categories.default_category`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Parse a TOML document without file or environment lookups.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
