use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub notification: NotificationConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What to send, to whom, and when.
///
/// All values arrive fully resolved; any variable substitution happens in the
/// pipeline framework that invokes this tool.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Sender address
    pub from_email: String,
    /// Recipient addresses, semicolon-delimited
    pub to_email: String,
    /// API key for the email delivery service
    pub api_key: String,
    /// Subject line; the run outcome label is prefixed at send time
    pub subject: String,
    /// Message body, sent as-is
    pub body: String,
    /// When the notification fires relative to the run outcome
    #[serde(default = "default_run_condition")]
    pub run_condition: TriggerPolicy,
}

/// Rule selecting whether a notification fires based on the run outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerPolicy {
    /// Fire only when the run succeeded
    Success,
    /// Fire only when the run failed
    Failure,
    /// Fire regardless of how the run ended
    Completion,
}

impl TriggerPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerPolicy::Success => "success",
            TriggerPolicy::Failure => "failure",
            TriggerPolicy::Completion => "completion",
        }
    }
}

impl std::fmt::Display for TriggerPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_run_condition() -> TriggerPolicy {
    TriggerPolicy::Completion
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// Base URL of the email delivery API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for the delivery request in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.sendgrid.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is an error: there is no meaningful default for the
    /// delivery credentials or the recipient list.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse configuration file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [notification]
            from_email = "pipeline@example.com"
            to_email = "ops@example.com;dev@example.com"
            api_key = "SG.secret"
            subject = "nightly ETL"
            body = "See the pipeline dashboard for details."
            run_condition = "failure"

            [transport]
            base_url = "http://localhost:9090"
            timeout_secs = 5

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.notification.from_email, "pipeline@example.com");
        assert_eq!(config.notification.run_condition, TriggerPolicy::Failure);
        assert_eq!(config.transport.base_url, "http://localhost:9090");
        assert_eq!(config.transport.timeout_secs, 5);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_defaults_applied_when_sections_omitted() {
        let config: Config = toml::from_str(
            r#"
            [notification]
            from_email = "pipeline@example.com"
            to_email = "ops@example.com"
            api_key = "SG.secret"
            subject = "nightly ETL"
            body = "done"
            "#,
        )
        .unwrap();

        assert_eq!(config.notification.run_condition, TriggerPolicy::Completion);
        assert_eq!(config.transport.base_url, "https://api.sendgrid.com");
        assert_eq!(config.transport.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unrecognized_run_condition_is_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r#"
            [notification]
            from_email = "pipeline@example.com"
            to_email = "ops@example.com"
            api_key = "SG.secret"
            subject = "nightly ETL"
            body = "done"
            run_condition = "sometimes"
            "#,
        );

        assert!(result.is_err());
    }
}
