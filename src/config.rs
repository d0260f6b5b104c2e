//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Dashboard engine configuration.
///
/// The partnership and user ids come from the authenticated session the
/// shell already holds; the engine never derives them itself.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the action-item store / telemetry endpoints.
    pub api_base_url: String,
    /// Tenant scope — all commands operate on this partnership's items.
    pub partnership_id: String,
    /// The visiting user, carried on every request for audit.
    pub user_id: String,
    /// Per-request timeout for store round trips.
    pub request_timeout: Duration,
}

impl DashboardConfig {
    /// Build a config for a partnership/user pair with default timeout.
    pub fn new(
        api_base_url: impl Into<String>,
        partnership_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            partnership_id: partnership_id.into(),
            user_id: user_id.into(),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Read configuration from the environment.
    ///
    /// `PARTNER_DASH_API_URL` is required; ids are required because the
    /// engine has no session layer of its own to fall back on.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("PARTNER_DASH_API_URL")
            .map_err(|_| ConfigError::MissingEnvVar("PARTNER_DASH_API_URL".into()))?;

        let partnership_id = std::env::var("PARTNER_DASH_PARTNERSHIP_ID")
            .map_err(|_| ConfigError::MissingEnvVar("PARTNER_DASH_PARTNERSHIP_ID".into()))?;

        let user_id = std::env::var("PARTNER_DASH_USER_ID")
            .map_err(|_| ConfigError::MissingEnvVar("PARTNER_DASH_USER_ID".into()))?;

        let timeout_secs: u64 = match std::env::var("PARTNER_DASH_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PARTNER_DASH_TIMEOUT_SECS".into(),
                message: format!("not a number: {raw}"),
            })?,
            Err(_) => 10,
        };

        Ok(Self {
            api_base_url,
            partnership_id,
            user_id,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_timeout() {
        let cfg = DashboardConfig::new("https://api.example.com", "p1", "u1");
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert_eq!(cfg.partnership_id, "p1");
        assert_eq!(cfg.user_id, "u1");
    }
}
