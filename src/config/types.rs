use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-email",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-top-read",
    "user-follow-read",
];

/// Application credentials and Spotify endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotgateConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SpotgateConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            api_base_url: default_api_base_url(),
            scopes: default_scopes(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl SpotgateConfig {
    /// Config with credentials set and every endpoint at its default.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Scopes joined the way the authorize endpoint expects them.
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }
}

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_minimal_config_uses_defaults() {
        let json = r#"{ "clientId": "abc", "clientSecret": "shh" }"#;
        let cfg: SpotgateConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.client_id, "abc");
        assert_eq!(cfg.client_secret, "shh");
        assert_eq!(cfg.auth_url, DEFAULT_AUTH_URL);
        assert_eq!(cfg.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(cfg.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(cfg.scopes.len(), 6);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn deserialize_overrides() {
        let json = r#"{
            "clientId": "abc",
            "clientSecret": "shh",
            "redirectUri": "http://127.0.0.1:9000/cb",
            "apiBaseUrl": "http://localhost:1234/v1",
            "scopes": ["user-top-read"],
            "requestTimeoutSecs": 3
        }"#;
        let cfg: SpotgateConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.redirect_uri, "http://127.0.0.1:9000/cb");
        assert_eq!(cfg.api_base_url, "http://localhost:1234/v1");
        assert_eq!(cfg.scopes, vec!["user-top-read"]);
        assert_eq!(cfg.request_timeout_secs, 3);
    }

    #[test]
    fn scope_param_is_space_joined() {
        let mut cfg = SpotgateConfig::new("id", "secret");
        cfg.scopes = vec!["user-top-read".into(), "user-follow-read".into()];
        assert_eq!(cfg.scope_param(), "user-top-read user-follow-read");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{ "clientId": "abc", "port": 3000 }"#;
        let cfg: SpotgateConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.client_id, "abc");
    }
}
