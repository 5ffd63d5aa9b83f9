use serde::Deserialize;

use crate::config::SpotgateConfig;
use crate::error::SpotgateError;
use crate::session::TokenGrant;

/// Raw token response from the Spotify accounts service.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
}

impl TokenResponse {
    /// Resolve `expires_in` against the current time. A lifetime that is not
    /// positive or does not fit a timestamp is reported as the error detail.
    fn into_grant(self) -> Result<TokenGrant, String> {
        let expires_in = self.expires_in;
        let invalid = || format!("invalid expires_in {expires_in}");
        if expires_in <= 0 {
            return Err(invalid());
        }
        let expires_at = chrono::Duration::try_seconds(expires_in)
            .and_then(|lifetime| chrono::Utc::now().checked_add_signed(lifetime))
            .ok_or_else(invalid)?;
        Ok(TokenGrant {
            access_token: self.access_token,
            refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
            expires_at,
        })
    }
}

/// OAuth error body (`{"error": "...", "error_description": "..."}`).
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grant {
    AuthorizationCode,
    RefreshToken,
}

impl Grant {
    fn failure(self, status: Option<u16>, detail: String) -> SpotgateError {
        match self {
            Grant::AuthorizationCode => SpotgateError::TokenExchange { status, detail },
            Grant::RefreshToken => SpotgateError::Refresh { status, detail },
        }
    }
}

/// Client for the token endpoint, authenticating with the app credentials.
#[derive(Clone)]
pub struct TokenClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl std::fmt::Debug for TokenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenClient")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl TokenClient {
    pub fn new(config: &SpotgateConfig) -> Result<Self, SpotgateError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SpotgateError::Config {
                path: std::path::PathBuf::from("<config>"),
                detail: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        })
    }

    /// Trade an authorization code for the initial token triple.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenGrant, SpotgateError> {
        self.request_grant(
            Grant::AuthorizationCode,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ],
        )
        .await
    }

    /// Trade a refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, SpotgateError> {
        self.request_grant(
            Grant::RefreshToken,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
        )
        .await
    }

    async fn request_grant(
        &self,
        grant: Grant,
        form: &[(&str, &str)],
    ) -> Result<TokenGrant, SpotgateError> {
        let resp = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await
            .map_err(|e| grant.failure(None, format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(grant.failure(Some(status.as_u16()), oauth_error_detail(&body)));
        }

        let token_resp: TokenResponse = resp.json().await.map_err(|e| {
            grant.failure(
                Some(status.as_u16()),
                format!("failed to parse token response: {e}"),
            )
        })?;

        token_resp
            .into_grant()
            .map_err(|detail| grant.failure(Some(status.as_u16()), detail))
    }
}

/// Best human-readable reason from an OAuth error body.
fn oauth_error_detail(body: &str) -> String {
    match serde_json::from_str::<OAuthErrorBody>(body) {
        Ok(OAuthErrorBody {
            error_description: Some(desc),
            ..
        }) => desc,
        Ok(OAuthErrorBody {
            error: Some(error), ..
        }) => error,
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.trim().to_string(),
    }
}
