//! Shared-secret admin check for ingestion

use axum::http::HeaderMap;

use crate::config::ServerConfig;
use crate::error::{Error, Result};

/// Header carrying the ingestion credential
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Reject unless the presented credential matches the configured secret
///
/// Ingestion is disabled entirely while no token is configured.
pub fn require_admin(headers: &HeaderMap, config: &ServerConfig) -> Result<()> {
    let expected = config.admin_token.as_deref().ok_or(Error::Unauthorized)?;

    let presented = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(Error::Unauthorized)?;

    if presented != expected {
        return Err(Error::Unauthorized);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_token(token: Option<&str>) -> ServerConfig {
        ServerConfig {
            admin_token: token.map(String::from),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn test_matching_token_is_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_TOKEN_HEADER, "secret".parse().unwrap());
        assert!(require_admin(&headers, &config_with_token(Some("secret"))).is_ok());
    }

    #[test]
    fn test_wrong_token_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_TOKEN_HEADER, "wrong".parse().unwrap());
        assert!(matches!(
            require_admin(&headers, &config_with_token(Some("secret"))),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(
            require_admin(&headers, &config_with_token(Some("secret"))),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn test_unconfigured_token_disables_ingestion() {
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_TOKEN_HEADER, "anything".parse().unwrap());
        assert!(matches!(
            require_admin(&headers, &config_with_token(None)),
            Err(Error::Unauthorized)
        ));
    }
}
