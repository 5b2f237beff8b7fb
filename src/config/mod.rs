#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{
    validate_aws_region, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub region: String,
    /// Static endpoint. Discovery requests go here, and so does everything
    /// else when discovery is off. Defaults to the regional endpoint.
    pub endpoint: Option<String>,
    /// Takes precedence over both discovery and `endpoint`.
    pub endpoint_override: Option<String>,
    pub endpoint_discovery: bool,
    pub worker_threads: usize,
    pub max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub max_backoff_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            endpoint_override: None,
            endpoint_discovery: true,
            worker_threads: 4,
            max_attempts: 3,
            retry_base_delay_ms: 100,
            max_backoff_ms: 20_000,
            connect_timeout_ms: 1_000,
            request_timeout_ms: 60_000,
        }
    }
}

impl ClientConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ClientError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ClientError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${AWS_REGION})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ClientError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env()
    }

    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(region) = lookup("AWS_REGION").or_else(|| lookup("AWS_DEFAULT_REGION")) {
            self.region = region;
        }
        if let Some(url) = lookup("AWS_ENDPOINT_URL_TIMESTREAM_QUERY") {
            self.endpoint_override = Some(url);
        }
        if let Some(flag) = lookup("AWS_ENABLE_ENDPOINT_DISCOVERY") {
            self.endpoint_discovery = match flag.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "auto" => true,
                "false" | "0" => false,
                other => {
                    return Err(ClientError::validation(
                        "AWS_ENABLE_ENDPOINT_DISCOVERY",
                        format!("expected true or false, got `{}`", other),
                    ))
                }
            };
        }
        if let Some(attempts) = lookup("AWS_MAX_ATTEMPTS") {
            self.max_attempts = attempts.trim().parse().map_err(|_| {
                ClientError::validation(
                    "AWS_MAX_ATTEMPTS",
                    format!("expected a positive integer, got `{}`", attempts),
                )
            })?;
        }
        Ok(self)
    }

    pub fn static_endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://query.timestream.{}.amazonaws.com", self.region),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validate_aws_region("region", &self.region)?;
        if let Some(endpoint) = &self.endpoint {
            validate_url("endpoint", endpoint)?;
        }
        if let Some(endpoint) = &self.endpoint_override {
            validate_url("endpoint_override", endpoint)?;
        }
        validate_range("worker_threads", self.worker_threads, 1, 256)?;
        validate_range("max_attempts", self.max_attempts, 1, 10)?;
        validate_range("connect_timeout_ms", self.connect_timeout_ms, 1, 600_000)?;
        validate_range("request_timeout_ms", self.request_timeout_ms, 1, 3_600_000)?;
        validate_range("max_backoff_ms", self.max_backoff_ms, self.retry_base_delay_ms, 600_000)?;

        tracing::debug!("client configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
region = "eu-west-1"
endpoint_discovery = false
max_attempts = 5
"#,
        )
        .unwrap();

        assert_eq!(config.region, "eu-west-1");
        assert!(!config.endpoint_discovery);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.worker_threads, 4);
        assert_eq!(
            config.static_endpoint(),
            "https://query.timestream.eu-west-1.amazonaws.com"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("TSQ_TEST_ENDPOINT_SUBST", "http://localhost:9000");
        let config = ClientConfig::from_toml_str(
            r#"endpoint = "${TSQ_TEST_ENDPOINT_SUBST}""#,
        )
        .unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000"));

        // Unknown variables are left untouched and then fail URL validation.
        let config =
            ClientConfig::from_toml_str(r#"endpoint = "${TSQ_TEST_UNSET_VARIABLE}""#).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("${TSQ_TEST_UNSET_VARIABLE}"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let err = ClientConfig::from_toml_str("region = ").unwrap_err();
        assert!(matches!(err, ClientError::ConfigError { .. }));
    }

    #[test]
    fn test_apply_env() {
        let env: HashMap<&str, &str> = [
            ("AWS_DEFAULT_REGION", "ap-southeast-2"),
            ("AWS_ENABLE_ENDPOINT_DISCOVERY", "false"),
            ("AWS_MAX_ATTEMPTS", "7"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::default()
            .apply_env_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.region, "ap-southeast-2");
        assert!(!config.endpoint_discovery);
        assert_eq!(config.max_attempts, 7);

        let err = ClientConfig::default()
            .apply_env_with(|key| (key == "AWS_MAX_ATTEMPTS").then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, ClientError::ValidationError { ref field, .. } if field == "AWS_MAX_ATTEMPTS"));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = ClientConfig {
            worker_threads: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            endpoint_override: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
