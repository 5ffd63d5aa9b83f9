use crate::config::{load_config, SpotgateConfig};
use crate::dispatch::{ApiRequest, Dispatcher};
use crate::error::SpotgateError;
use crate::gate::{self, GateDecision};
use crate::oauth::{build_authorization_request, AuthorizationRequest, CallbackParams, TokenClient};
use crate::refresh;
use crate::session::{AuthStatus, Session, TokenRecord};

/// Entry point for hosts: login, gating and authenticated API calls for
/// one application's credentials. Sessions are passed to every call.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    config: SpotgateConfig,
    tokens: TokenClient,
    dispatcher: Dispatcher,
}

impl SpotifyClient {
    /// Create a client by loading and validating the configuration.
    pub fn from_config(cli_config: Option<&str>) -> Result<Self, SpotgateError> {
        Self::with_config(load_config(cli_config)?)
    }

    /// Create a client from an existing config.
    pub fn with_config(config: SpotgateConfig) -> Result<Self, SpotgateError> {
        let tokens = TokenClient::new(&config)?;
        let dispatcher = Dispatcher::new(&config, tokens.clone())?;
        Ok(Self {
            config,
            tokens,
            dispatcher,
        })
    }

    pub fn config(&self) -> &SpotgateConfig {
        &self.config
    }

    /// Start a login attempt; keep the returned request to verify the callback.
    pub fn authorize(&self) -> Result<AuthorizationRequest, SpotgateError> {
        build_authorization_request(&self.config)
    }

    /// Handle the redirect back from Spotify.
    ///
    /// Verifies `state`, exchanges the code and stores the new tokens. On a
    /// failed exchange the session's tokens are cleared. Returns the path the
    /// user originally asked for, if the gate recorded one.
    pub async fn complete_authorization(
        &self,
        session: &Session,
        request: &AuthorizationRequest,
        params: CallbackParams,
    ) -> Result<Option<String>, SpotgateError> {
        if let Some(error) = params.error {
            return Err(SpotgateError::Authorization(format!(
                "Spotify denied the authorization: {error}"
            )));
        }
        request.verify_state(params.state.as_deref())?;
        let code = params.code.ok_or_else(|| {
            SpotgateError::Authorization("Authorization code is required".into())
        })?;

        match self.tokens.exchange_code(&code).await {
            Ok(grant) => {
                session.set_tokens(TokenRecord::from(grant)).await?;
                tracing::debug!("authorization code exchanged");
                session.take_return_to().await
            }
            Err(err) => {
                tracing::warn!(error = %err, "authorization code exchange failed");
                session.clear_tokens().await?;
                Err(err)
            }
        }
    }

    /// Guard a protected request for `path`.
    pub async fn gate(&self, session: &Session, path: &str) -> Result<GateDecision, SpotgateError> {
        gate::check(&self.tokens, session, path).await
    }

    /// Force a refresh of the session's access token.
    pub async fn refresh(&self, session: &Session) -> Result<TokenRecord, SpotgateError> {
        refresh::refresh_session(&self.tokens, session).await
    }

    /// Send an authenticated Web API call.
    pub async fn send(
        &self,
        session: &Session,
        request: ApiRequest,
    ) -> Result<Option<serde_json::Value>, SpotgateError> {
        self.dispatcher.send(session, request).await
    }

    pub async fn status(&self, session: &Session) -> Result<AuthStatus, SpotgateError> {
        Ok(session.tokens().await?.status_at(chrono::Utc::now()))
    }

    pub async fn logout(&self, session: &Session) -> Result<(), SpotgateError> {
        session.reset().await
    }
}
