use super::{types::Config, AuthMethod, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Auth section exists (enforced by serde)
/// - An API key is present when `api_key` auth is selected
/// - Server port is not 0
/// - Activity buffer is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.auth.method == AuthMethod::ApiKey
        && config.auth.api_key.as_deref().unwrap_or("").is_empty()
    {
        return Err(ConfigError::ValidationError(
            "auth.api_key must be set when auth.method is \"api_key\"".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // tokio's mpsc::channel panics on a zero capacity
    if config.activity.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "activity.buffer_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}
