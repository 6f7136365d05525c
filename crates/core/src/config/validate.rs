use super::{types::Config, AuthMethod, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Auth section exists (enforced by serde)
/// - Token auth has at least one non-empty token
/// - Server port is not 0
/// - Ticket page sizes are positive and consistent
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.auth.method == AuthMethod::Token {
        if config.auth.tokens.is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.tokens must not be empty when using token auth".to_string(),
            ));
        }
        if config.auth.tokens.iter().any(|grant| grant.token.is_empty()) {
            return Err(ConfigError::ValidationError(
                "auth.tokens entries must have a non-empty token".to_string(),
            ));
        }
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.tickets.per_page == 0 {
        return Err(ConfigError::ValidationError(
            "tickets.per_page cannot be 0".to_string(),
        ));
    }

    if config.tickets.per_page > config.tickets.max_per_page {
        return Err(ConfigError::ValidationError(format!(
            "tickets.per_page ({}) exceeds tickets.max_per_page ({})",
            config.tickets.per_page, config.tickets.max_per_page
        )));
    }

    Ok(())
}
