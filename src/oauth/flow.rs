use std::time::Duration;

use reqwest::Url;

use crate::client::SpotifyClient;
use crate::error::SpotgateError;
use crate::oauth::callback::listen_for_callback;
use crate::session::Session;

/// Run the browser login for `session`: open the authorize page, wait for
/// the redirect on the local port named by the redirect URI, and store the
/// exchanged tokens. Returns the recorded post-login path, if any.
pub async fn run_login_flow(
    client: &SpotifyClient,
    session: &Session,
    timeout: Duration,
) -> Result<Option<String>, SpotgateError> {
    let port = callback_port(&client.config().redirect_uri)?;
    let request = client.authorize()?;

    if webbrowser::open(&request.url).is_err() {
        tracing::warn!("Could not open browser automatically. Please visit:\n{}", request.url);
    }

    let params = listen_for_callback(port, timeout).await?;
    client.complete_authorization(session, &request, params).await
}

/// Local port the redirect URI points at; only loopback hosts can be served.
fn callback_port(redirect_uri: &str) -> Result<u16, SpotgateError> {
    let url = Url::parse(redirect_uri).map_err(|e| {
        SpotgateError::Authorization(format!("Invalid redirect URI '{redirect_uri}': {e}"))
    })?;
    match url.host_str() {
        Some("localhost") | Some("127.0.0.1") => {}
        _ => {
            return Err(SpotgateError::Authorization(format!(
                "Redirect URI '{redirect_uri}' must point at localhost or 127.0.0.1 for CLI login"
            )))
        }
    }
    url.port_or_known_default().ok_or_else(|| {
        SpotgateError::Authorization(format!("Redirect URI '{redirect_uri}' has no port"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_port_from_default_redirect() {
        assert_eq!(callback_port("http://localhost:8888/callback").unwrap(), 8888);
        assert_eq!(callback_port("http://127.0.0.1:3000/callback").unwrap(), 3000);
    }

    #[test]
    fn callback_port_known_default() {
        assert_eq!(callback_port("http://localhost/callback").unwrap(), 80);
    }

    #[test]
    fn callback_port_rejects_remote_hosts() {
        let err = callback_port("https://example.com/callback").unwrap_err();
        assert!(err.to_string().contains("localhost"));
    }
}
