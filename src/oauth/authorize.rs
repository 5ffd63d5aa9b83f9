use reqwest::Url;

use crate::config::SpotgateConfig;
use crate::error::SpotgateError;

use super::state::generate_state;

/// A login attempt: where to send the user, and the `state` to expect back.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

impl AuthorizationRequest {
    /// Check the `state` echoed by the callback against the issued one.
    pub fn verify_state(&self, returned: Option<&str>) -> Result<(), SpotgateError> {
        match returned {
            Some(state) if state == self.state => Ok(()),
            Some(_) => Err(SpotgateError::Authorization(
                "state mismatch in callback; possible CSRF attempt".into(),
            )),
            None => Err(SpotgateError::Authorization(
                "callback is missing the state parameter".into(),
            )),
        }
    }
}

/// Build the authorize-endpoint URL with a fresh `state`.
pub fn build_authorization_request(
    config: &SpotgateConfig,
) -> Result<AuthorizationRequest, SpotgateError> {
    let state = generate_state();
    let mut url = Url::parse(&config.auth_url).map_err(|e| SpotgateError::Config {
        path: std::path::PathBuf::from("<config>"),
        detail: format!("authUrl '{}' is invalid: {e}", config.auth_url),
    })?;

    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("state", &state)
        .append_pair("scope", &config.scope_param());

    Ok(AuthorizationRequest {
        url: url.into(),
        state,
    })
}
