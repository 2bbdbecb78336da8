use thiserror::Error;

use super::models::Config;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("tmdb.base_url must not be empty")]
    EmptyBaseUrl,
    #[error("tmdb.retry_attempts must be at least 1")]
    ZeroRetryAttempts,
    #[error("catalog.default_limit ({default_limit}) exceeds catalog.max_limit ({max_limit})")]
    DefaultLimitAboveMax {
        default_limit: usize,
        max_limit: usize,
    },
    #[error("catalog.max_limit must be at least 1")]
    ZeroMaxLimit,
}

pub fn validate(config: &Config) -> Result<(), ValidationError> {
    if config.tmdb.base_url.trim().is_empty() {
        return Err(ValidationError::EmptyBaseUrl);
    }

    if config.tmdb.retry_attempts == 0 {
        return Err(ValidationError::ZeroRetryAttempts);
    }

    if config.catalog.max_limit == 0 {
        return Err(ValidationError::ZeroMaxLimit);
    }

    if config.catalog.default_limit > config.catalog.max_limit {
        return Err(ValidationError::DefaultLimitAboveMax {
            default_limit: config.catalog.default_limit,
            max_limit: config.catalog.max_limit,
        });
    }

    Ok(())
}
