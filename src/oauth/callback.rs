use std::time::Duration;

use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::error::SpotgateError;

/// Query parameters Spotify appends to the redirect URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Parse from a request target such as `/callback?code=...&state=...`.
    pub fn from_request_target(target: &str) -> Result<Self, SpotgateError> {
        let url = Url::parse("http://localhost")
            .and_then(|base| base.join(target))
            .map_err(|e| {
                SpotgateError::Authorization(format!("Malformed callback target '{target}': {e}"))
            })?;

        let mut params = CallbackParams::default();
        for (key, value) in url.query_pairs() {
            let value = Some(value.into_owned()).filter(|v| !v.is_empty());
            match key.as_ref() {
                "code" => params.code = value,
                "state" => params.state = value,
                "error" => params.error = value,
                _ => {}
            }
        }
        Ok(params)
    }
}

/// Accept a single redirect on `port` and return its query parameters.
pub async fn listen_for_callback(
    port: u16,
    timeout: Duration,
) -> Result<CallbackParams, SpotgateError> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    tracing::debug!(port, "waiting for OAuth callback");

    let accept_future = async {
        let (mut stream, _) = listener.accept().await?;

        let mut buf = vec![0u8; 4096];
        let n = stream.read(&mut buf).await?;
        let request = String::from_utf8_lossy(&buf[..n]);

        let params =
            parse_request_line(&request).and_then(CallbackParams::from_request_target);

        let (status, body) = match &params {
            Ok(p) if p.code.is_some() => (
                "200 OK",
                "<!DOCTYPE html><html><body><h1>Logged in to Spotify.</h1>\
                 <p>You can close this window and return to the terminal.</p></body></html>",
            ),
            _ => (
                "400 Bad Request",
                "<!DOCTYPE html><html><body><h1>Spotify login failed.</h1>\
                 <p>Return to the terminal for details.</p></body></html>",
            ),
        };
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len(),
        );
        stream.write_all(response.as_bytes()).await?;
        stream.shutdown().await?;

        Ok::<CallbackParams, SpotgateError>(params?)
    };

    tokio::time::timeout(timeout, accept_future)
        .await
        .map_err(|_| {
            SpotgateError::Authorization(format!(
                "Timed out waiting for the login callback after {}s",
                timeout.as_secs()
            ))
        })?
}

/// Request target from a "GET /callback?code=... HTTP/1.1" line.
fn parse_request_line(request: &str) -> Result<&str, SpotgateError> {
    request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .ok_or_else(|| SpotgateError::Authorization("Malformed callback request".into()))
}
