use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the remote task service, e.g. `https://tasks.example.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token; written by `tm login`, absent until then
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color overrides by role name (hex strings like "#FF4444")
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Show the key-hint line at the bottom of the tasks view
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            colors: HashMap::new(),
            show_key_hints: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.service.base_url, "http://localhost:3000");
        assert_eq!(config.service.token, None);
        assert_eq!(config.service.timeout_secs, 10);
        assert!(config.ui.show_key_hints);
    }

    #[test]
    fn test_parse_full() {
        let config: Config = toml::from_str(
            r##"
[service]
base_url = "https://tasks.example.com"
token = "abc123"

[ui]
show_key_hints = false

[ui.colors]
highlight = "#FB4196"
"##,
        )
        .unwrap();
        assert_eq!(config.service.base_url, "https://tasks.example.com");
        assert_eq!(config.service.token.as_deref(), Some("abc123"));
        assert!(!config.ui.show_key_hints);
        assert_eq!(
            config.ui.colors.get("highlight").map(String::as_str),
            Some("#FB4196")
        );
    }

    #[test]
    fn test_token_not_serialized_when_absent() {
        let out = toml::to_string(&Config::default()).unwrap();
        assert!(!out.contains("token"));
    }
}
