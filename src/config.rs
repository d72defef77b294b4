//! Job configuration (subwatch.toml).
//!
//! Everything the lane needs at startup lives in one TOML file: the
//! service principal, the sender mailbox, and the default notification
//! recipient. The client secret may instead come from the
//! `SUBWATCH_CLIENT_SECRET` environment variable so the file can stay
//! secret-free.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use subwatch_core::DEFAULT_WARN_LEAD_DAYS;

/// Environment variable consulted when the file omits `client_secret`.
pub const CLIENT_SECRET_ENV: &str = "SUBWATCH_CLIENT_SECRET";

/// Error types for config operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

fn default_team_name() -> String {
    "Cloud Team".to_string()
}

fn default_warn_lead_days() -> i64 {
    DEFAULT_WARN_LEAD_DAYS
}

/// Startup configuration for one sweep.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Entra ID tenant the service principal lives in.
    pub tenant_id: String,

    /// Service principal application id.
    pub client_id: String,

    /// Service principal secret. Optional in the file; falls back to
    /// [`CLIENT_SECRET_ENV`].
    #[serde(default)]
    pub client_secret: String,

    /// Mailbox the notifications are sent from.
    pub sender: String,

    /// Address included in every notification regardless of tags.
    pub default_recipient: String,

    /// Ticket/self-service URL included in notification bodies.
    #[serde(default)]
    pub ticket_url: Option<String>,

    /// Signature line for notification bodies.
    #[serde(default = "default_team_name")]
    pub team_name: String,

    /// Days before the deletion date at which the warning goes out.
    #[serde(default = "default_warn_lead_days")]
    pub warn_lead_days: i64,
}

impl JobConfig {
    /// Load and parse config from a TOML file, applying the environment
    /// fallback for the client secret.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let mut config: JobConfig = toml::from_str(&contents)?;
        if config.client_secret.is_empty() {
            if let Ok(secret) = env::var(CLIENT_SECRET_ENV) {
                config.client_secret = secret;
            }
        }
        Ok(config)
    }

    /// Check that every required value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("tenant_id", &self.tenant_id),
            ("client_id", &self.client_id),
            ("sender", &self.sender),
            ("default_recipient", &self.default_recipient),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{field} must be set")));
            }
        }
        if self.client_secret.is_empty() {
            return Err(ConfigError::Validation(format!(
                "client_secret must be set in the file or via {CLIENT_SECRET_ENV}"
            )));
        }
        if self.warn_lead_days <= 0 {
            return Err(ConfigError::Validation(format!(
                "warn_lead_days must be positive, got {}",
                self.warn_lead_days
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
            tenant_id = "tenant"
            client_id = "app"
            client_secret = "s3cret"
            sender = "noreply@contoso.com"
            default_recipient = "cloud-team@contoso.com"
        "#
    }

    #[test]
    fn test_parse_minimal() {
        let config: JobConfig = toml::from_str(minimal_toml()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.warn_lead_days, 14);
        assert_eq!(config.team_name, "Cloud Team");
        assert!(config.ticket_url.is_none());
    }

    #[test]
    fn test_parse_full() {
        let config: JobConfig = toml::from_str(
            r#"
                tenant_id = "tenant"
                client_id = "app"
                client_secret = "s3cret"
                sender = "noreply@contoso.com"
                default_recipient = "cloud-team@contoso.com"
                ticket_url = "https://jira.contoso.com/servicedesk"
                team_name = "Platform Team"
                warn_lead_days = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.warn_lead_days, 30);
        assert_eq!(config.team_name, "Platform Team");
        assert_eq!(
            config.ticket_url.as_deref(),
            Some("https://jira.contoso.com/servicedesk")
        );
    }

    #[test]
    fn test_missing_required_field_fails_parse() {
        let result: Result<JobConfig, _> = toml::from_str(r#"tenant_id = "tenant""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_blank_values() {
        let mut config: JobConfig = toml::from_str(minimal_toml()).unwrap();
        config.sender = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_secret() {
        let mut config: JobConfig = toml::from_str(minimal_toml()).unwrap();
        config.client_secret.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(CLIENT_SECRET_ENV));
    }

    #[test]
    fn test_validate_rejects_nonpositive_lead() {
        let mut config: JobConfig = toml::from_str(minimal_toml()).unwrap();
        config.warn_lead_days = 0;
        assert!(config.validate().is_err());
    }
}
