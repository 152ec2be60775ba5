use reqwest::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Engine URL is set and parses
/// - Engine API key is set
/// - Engine timeout is non-zero
/// - Default category is not blank
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let engine = &config.engine;
    if engine.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "engine.url must be set".to_string(),
        ));
    }
    Url::parse(&engine.url).map_err(|e| {
        ConfigError::ValidationError(format!("engine.url is not a valid URL: {}", e))
    })?;
    if engine.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "engine.api_key must be set".to_string(),
        ));
    }
    if engine.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "engine.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.categories.default_category.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "categories.default_category cannot be empty".to_string(),
        ));
    }

    Ok(())
}
