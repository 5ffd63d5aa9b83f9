use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SpotgateError {
    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("{}", format_upstream("Token exchange failed", *.status, .detail))]
    TokenExchange { status: Option<u16>, detail: String },

    #[error("{}", format_upstream("Token refresh failed", *.status, .detail))]
    Refresh { status: Option<u16>, detail: String },

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Not authenticated. Run: spotgate login")]
    NotAuthenticated,

    #[error("{}", format_upstream("Spotify API request failed", Some(*.status), .detail))]
    UpstreamApi { status: u16, detail: String },

    #[error("Invalid response from Spotify: {0}")]
    InvalidResponse(String),

    #[error("Error in config {}: {detail}", path.display())]
    Config { path: PathBuf, detail: String },

    #[error("Session store error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_upstream(what: &str, status: Option<u16>, detail: &str) -> String {
    match status {
        Some(code) => format!("{what} with status {code}: {detail}"),
        None => format!("{what}: {detail}"),
    }
}

impl SpotgateError {
    /// Error code string for structured JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            SpotgateError::Authorization(_) => "authorization_error",
            SpotgateError::TokenExchange { .. } => "token_exchange_error",
            SpotgateError::Refresh { .. } => "refresh_error",
            SpotgateError::NoRefreshToken => "no_refresh_token",
            SpotgateError::NotAuthenticated => "not_authenticated",
            SpotgateError::UpstreamApi { .. } => "upstream_api_error",
            SpotgateError::InvalidResponse(_) => "invalid_response",
            SpotgateError::Config { .. } => "config_error",
            SpotgateError::Session(_) => "session_error",
            SpotgateError::Io(_) => "io_error",
        }
    }

    /// Upstream HTTP status, when the failure came from a Spotify response.
    pub fn status(&self) -> Option<u16> {
        match self {
            SpotgateError::TokenExchange { status, .. } => *status,
            SpotgateError::Refresh { status, .. } => *status,
            SpotgateError::UpstreamApi { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the session has to go through the authorization flow again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            SpotgateError::Refresh { .. }
                | SpotgateError::NoRefreshToken
                | SpotgateError::NotAuthenticated
        )
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        if let Some(status) = self.status() {
            obj.insert("status".into(), serde_json::Value::from(status));
        }
        obj.insert("message".into(), serde_json::Value::String(self.to_string()));
        obj.insert("code".into(), serde_json::Value::String(self.code().to_string()));
        serde_json::json!({ "error": obj })
    }
}
