//! # Dashboard Configuration
//!
//! Layered with figment: built-in defaults, then an optional JSON file, then
//! `ADMIN_API_*` environment variables.
//!
//! | Variable                      | Field                    |
//! |-------------------------------|--------------------------|
//! | `ADMIN_API_BASE_URL`          | `base_url`               |
//! | `ADMIN_API_TOKEN`             | `bearer_token`           |
//! | `ADMIN_API_TIMEOUT_MS`        | `timeout_ms`             |
//! | `ADMIN_API_RETRIES`           | `retry.max_retries`      |
//! | `ADMIN_API_RETRY_DELAY_MS`    | `retry.base_delay`       |
//!
//! Any other `ADMIN_API_<FIELD>` variable lands on the lowercased field of
//! the same name. A blank token means "no token".
//!
//! ```json
//! {
//!   "base_url": "https://admin.example.com/api/v1",
//!   "timeout_ms": 5000,
//!   "retry": { "max_retries": 1, "base_delay": 250 },
//!   "notifications": {
//!     "tenants": { "create_success": "Tenant provisioned" }
//!   }
//! }
//! ```

use crate::error::DashboardError;
use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use resource_framework::{ConfigError, Notifications, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const ENV_PREFIX: &str = "ADMIN_API_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub timeout_ms: u64,
    pub retry: RetryPolicy,
    /// Message overrides keyed by resource name (`"tenants"`, `"events"`, ...).
    pub notifications: BTreeMap<String, NotificationOverrides>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1".to_string(),
            bearer_token: None,
            timeout_ms: 10_000,
            retry: RetryPolicy::default(),
            notifications: BTreeMap::new(),
        }
    }
}

/// Replacement texts for some of a resource's stock messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationOverrides {
    pub create_success: Option<String>,
    pub update_success: Option<String>,
    pub delete_success: Option<String>,
    pub restore_success: Option<String>,
    pub hard_delete_success: Option<String>,
    pub failure_fallback: Option<String>,
}

impl NotificationOverrides {
    pub fn apply(&self, mut base: Notifications) -> Notifications {
        let fields = [
            (&self.create_success, &mut base.create_success),
            (&self.update_success, &mut base.update_success),
            (&self.delete_success, &mut base.delete_success),
            (&self.restore_success, &mut base.restore_success),
            (&self.hard_delete_success, &mut base.hard_delete_success),
            (&self.failure_fallback, &mut base.failure_fallback),
        ];
        for (value, target) in fields {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
        base
    }
}

impl DashboardConfig {
    /// Defaults, then the file (if given), then environment overrides; validated.
    pub fn load(path: Option<&Path>) -> Result<Self, DashboardError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(DashboardError::MissingConfig {
                    path: path.to_path_buf(),
                });
            }
            debug!(path = %path.display(), "Reading configuration file");
            figment = figment.merge(Json::file(path));
        }

        let mut config: Self = figment.merge(env_overrides()).extract()?;
        config.bearer_token = config.bearer_token.filter(|t| !t.trim().is_empty());
        config.validate()?;
        info!(base_url = %config.base_url, timeout_ms = config.timeout_ms, "Configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL, got `{}`",
                self.base_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be greater than 0".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Stock messages for `label`, with any overrides for `resource` applied.
    pub fn notifications_for(&self, resource: &str, label: &str) -> Notifications {
        let base = Notifications::for_label(label);
        match self.notifications.get(resource) {
            Some(overrides) => overrides.apply(base),
            None => base,
        }
    }
}

/// `ADMIN_API_*` variables, with the short names mapped onto their fields.
fn env_overrides() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| {
        match key.as_str() {
            "token" => "bearer_token",
            "retries" => "retry.max_retries",
            "retry_delay_ms" => "retry.base_delay",
            other => other,
        }
        .to_string()
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_are_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "dashboard.json",
                r#"{
                    "base_url": "https://admin.example.com/api",
                    "retry": { "max_retries": 1 },
                    "notifications": { "tenants": { "create_success": "Tenant provisioned" } }
                }"#,
            )?;
            let config = DashboardConfig::load(Some(Path::new("dashboard.json")))
                .map_err(|e| e.to_string())?;

            assert_eq!(config.base_url, "https://admin.example.com/api");
            assert_eq!(config.retry.max_retries, 1);
            assert_eq!(config.retry.base_delay, Duration::from_millis(1000));
            assert_eq!(config.timeout_ms, 10_000);

            let tenants = config.notifications_for("tenants", "Tenant");
            assert_eq!(tenants.create_success, "Tenant provisioned");
            assert_eq!(tenants.update_success, "Tenant updated successfully");

            let teams = config.notifications_for("teams", "Team");
            assert_eq!(teams, Notifications::for_label("Team"));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env("ADMIN_API_BASE_URL", "https://staging.example.com/api");
            jail.set_env("ADMIN_API_TOKEN", "secret");
            jail.set_env("ADMIN_API_TIMEOUT_MS", "2500");
            jail.set_env("ADMIN_API_RETRIES", "0");
            jail.set_env("ADMIN_API_RETRY_DELAY_MS", "50");

            let config = DashboardConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.base_url, "https://staging.example.com/api");
            assert_eq!(config.bearer_token.as_deref(), Some("secret"));
            assert_eq!(config.timeout_ms, 2500);
            assert_eq!(config.retry.max_retries, 0);
            assert_eq!(config.retry.base_delay, Duration::from_millis(50));
            Ok(())
        });
    }

    #[test]
    fn test_env_wins_over_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "dashboard.json",
                r#"{ "base_url": "https://file.example.com/api", "timeout_ms": 4000 }"#,
            )?;
            jail.set_env("ADMIN_API_BASE_URL", "https://env.example.com/api");

            let config = DashboardConfig::load(Some(Path::new("dashboard.json")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.base_url, "https://env.example.com/api");
            assert_eq!(config.timeout_ms, 4000);
            Ok(())
        });
    }

    #[test]
    fn test_blank_token_clears() {
        Jail::expect_with(|jail| {
            jail.create_file("dashboard.json", r#"{ "bearer_token": "old" }"#)?;
            jail.set_env("ADMIN_API_TOKEN", "  ");

            let config = DashboardConfig::load(Some(Path::new("dashboard.json")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.bearer_token, None);
            Ok(())
        });
    }

    #[test]
    fn test_bad_number_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("ADMIN_API_RETRIES", "many");

            let err = DashboardConfig::load(None).unwrap_err();
            assert!(matches!(err, DashboardError::Load(_)));
            assert!(err.to_string().contains("many"));
            Ok(())
        });
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_url = DashboardConfig {
            base_url: "localhost:8080".into(),
            ..DashboardConfig::default()
        };
        assert!(bad_url.validate().is_err());

        let zero_timeout = DashboardConfig {
            timeout_ms: 0,
            ..DashboardConfig::default()
        };
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn test_invalid_env_value_fails_validation() {
        Jail::expect_with(|jail| {
            jail.set_env("ADMIN_API_TIMEOUT_MS", "0");

            let err = DashboardConfig::load(None).unwrap_err();
            assert!(matches!(err, DashboardError::Config(ConfigError::Invalid(_))));
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = Path::new("/nonexistent/dashboard.json");
        let err = DashboardConfig::load(Some(path)).unwrap_err();
        assert!(matches!(err, DashboardError::MissingConfig { .. }));
        assert!(err.to_string().contains("/nonexistent/dashboard.json"));
    }
}
