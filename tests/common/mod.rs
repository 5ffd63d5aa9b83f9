pub mod spotify_mock;

use std::sync::Arc;

use spotgate::{MemorySessionStore, Session, SpotgateConfig, SpotifyClient, TokenRecord};

pub const CLIENT_ID: &str = "client";
pub const CLIENT_SECRET: &str = "secret";
/// `Basic base64("client:secret")`
pub const BASIC_AUTH: &str = "Basic Y2xpZW50OnNlY3JldA==";

/// Config pointing every endpoint at a mock server.
pub fn mock_config(base: &str) -> SpotgateConfig {
    let mut config = SpotgateConfig::new(CLIENT_ID, CLIENT_SECRET);
    config.auth_url = format!("{base}/authorize");
    config.token_url = format!("{base}/api/token");
    config.api_base_url = format!("{base}/v1");
    config.redirect_uri = "http://localhost:8888/callback".into();
    config.request_timeout_secs = 5;
    config
}

#[allow(dead_code)]
pub fn mock_client(base: &str) -> SpotifyClient {
    SpotifyClient::with_config(mock_config(base)).unwrap()
}

#[allow(dead_code)]
pub fn session_with(tokens: TokenRecord) -> Session {
    Session::new(Arc::new(MemorySessionStore::with_tokens(tokens)))
}

#[allow(dead_code)]
pub fn expired_record(refresh_token: &str) -> TokenRecord {
    TokenRecord {
        access_token: Some("AT0".into()),
        refresh_token: Some(refresh_token.into()),
        expires_at: Some(chrono::Utc::now() - chrono::Duration::minutes(5)),
    }
}

#[allow(dead_code)]
pub fn valid_record(access_token: &str) -> TokenRecord {
    TokenRecord {
        access_token: Some(access_token.into()),
        refresh_token: Some("RT1".into()),
        expires_at: Some(chrono::Utc::now() + chrono::Duration::hours(1)),
    }
}

/// Write a config file for the binary and return its directory.
#[allow(dead_code)]
pub fn temp_config_dir(config: &SpotgateConfig) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let json = serde_json::to_string_pretty(config).unwrap();
    std::fs::write(dir.path().join("spotgate.json"), json).unwrap();
    dir
}
