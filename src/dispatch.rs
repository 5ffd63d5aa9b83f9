use reqwest::Method;
use serde::Deserialize;

use crate::config::SpotgateConfig;
use crate::error::SpotgateError;
use crate::oauth::TokenClient;
use crate::refresh::ensure_fresh;
use crate::session::Session;

/// One call against the Web API, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path under the API base, optionally with a query string.
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn put(path: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self {
            method: Method::PUT,
            path: path.into(),
            body,
        }
    }
}

/// Error envelope used by the Web API:
/// `{"error": {"status": 404, "message": "...", "reason": "NO_ACTIVE_DEVICE"}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Sends Web API calls with the session's bearer token.
///
/// This is the only place a bearer header is attached. Each call checks
/// expiry first, refreshes through the session's refresh guard when needed,
/// and never goes out without a usable access token.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    http: reqwest::Client,
    api_base: String,
    tokens: TokenClient,
}

impl Dispatcher {
    pub fn new(config: &SpotgateConfig, tokens: TokenClient) -> Result<Self, SpotgateError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SpotgateError::Config {
                path: std::path::PathBuf::from("<config>"),
                detail: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            api_base: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Execute `request`, returning the decoded JSON body (`None` when the
    /// response has no body, e.g. 204).
    pub async fn send(
        &self,
        session: &Session,
        request: ApiRequest,
    ) -> Result<Option<serde_json::Value>, SpotgateError> {
        let current = session.tokens().await?;
        if current.is_empty() {
            return Err(SpotgateError::NotAuthenticated);
        }

        let record = ensure_fresh(&self.tokens, session).await?;
        let now = chrono::Utc::now();
        let access_token = record
            .usable_access_token(now)
            .ok_or(SpotgateError::NotAuthenticated)?;

        let url = self.url_for(&request.path);
        tracing::debug!(method = %request.method, %url, "calling Spotify API");

        let mut http_req = self
            .http
            .request(request.method.clone(), &url)
            .bearer_auth(access_token);
        if let Some(body) = &request.body {
            http_req = http_req.json(body);
        }

        let response = http_req.send().await.map_err(|e| SpotgateError::UpstreamApi {
            status: e.status().map(|s| s.as_u16()).unwrap_or(0),
            detail: format!("request to {url} failed: {e}"),
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SpotgateError::InvalidResponse(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(SpotgateError::UpstreamApi {
                status: status.as_u16(),
                detail: api_error_detail(&body),
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| SpotgateError::InvalidResponse(format!("{} {}: {e}", request.method, request.path)))
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

/// Best human-readable reason from a Web API error body.
fn api_error_detail(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            error: ApiErrorDetail {
                message: Some(message),
                reason: Some(reason),
            },
        }) => format!("{message} ({reason})"),
        Ok(ApiErrorBody {
            error: ApiErrorDetail {
                message: Some(text),
                ..
            },
        })
        | Ok(ApiErrorBody {
            error: ApiErrorDetail {
                reason: Some(text),
                ..
            },
        }) => text,
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher(api_base: &str) -> Dispatcher {
        let mut config = SpotgateConfig::new("id", "secret");
        config.api_base_url = api_base.into();
        let tokens = TokenClient::new(&config).unwrap();
        Dispatcher::new(&config, tokens).unwrap()
    }

    #[test]
    fn url_joins_base_and_path() {
        let d = dispatcher("https://api.spotify.com/v1/");
        assert_eq!(
            d.url_for("/me/player/pause"),
            "https://api.spotify.com/v1/me/player/pause"
        );
        assert_eq!(
            d.url_for("me/top/tracks?limit=5"),
            "https://api.spotify.com/v1/me/top/tracks?limit=5"
        );
    }

    #[test]
    fn api_error_detail_variants() {
        assert_eq!(
            api_error_detail(
                r#"{"error":{"status":404,"message":"Player command failed: No active device found","reason":"NO_ACTIVE_DEVICE"}}"#
            ),
            "Player command failed: No active device found (NO_ACTIVE_DEVICE)"
        );
        assert_eq!(
            api_error_detail(r#"{"error":{"status":401,"message":"The access token expired"}}"#),
            "The access token expired"
        );
        assert_eq!(
            api_error_detail(r#"{"error":{"reason":"PREMIUM_REQUIRED"}}"#),
            "PREMIUM_REQUIRED"
        );
        assert_eq!(api_error_detail("Too Many Requests"), "Too Many Requests");
        assert_eq!(api_error_detail(""), "empty response body");
    }

    #[tokio::test]
    async fn empty_session_is_not_authenticated() {
        let d = dispatcher("http://127.0.0.1:9/v1");
        let session = Session::in_memory();
        let err = d
            .send(&session, ApiRequest::get("/me/player/currently-playing"))
            .await
            .unwrap_err();
        assert!(matches!(err, SpotgateError::NotAuthenticated));
    }
}
