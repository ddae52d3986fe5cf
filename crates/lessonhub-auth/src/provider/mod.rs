//! Identity provider implementations.

pub mod http;
pub mod memory;

pub use http::HttpIdentityProvider;
pub use memory::MemoryIdentityProvider;

use std::sync::Arc;

use lessonhub_core::config::identity::IdentityConfig;
use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::traits::IdentityProvider;

/// Build the identity provider named by the configuration.
pub fn build_identity_provider(config: &IdentityConfig) -> AppResult<Arc<dyn IdentityProvider>> {
    match config.provider.as_str() {
        "http" => Ok(Arc::new(HttpIdentityProvider::new(config)?)),
        "memory" => Ok(Arc::new(MemoryIdentityProvider::new())),
        other => Err(AppError::configuration(format!(
            "Unknown identity provider '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_selection() {
        let mut config = IdentityConfig::default();

        config.provider = "memory".to_string();
        let provider = build_identity_provider(&config).unwrap();
        assert_eq!(provider.provider_type(), "memory");

        config.provider = "http".to_string();
        let provider = build_identity_provider(&config).unwrap();
        assert_eq!(provider.provider_type(), "http");

        config.provider = "ldap".to_string();
        assert!(build_identity_provider(&config).is_err());
    }
}
