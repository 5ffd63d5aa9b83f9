pub mod auth;
pub mod output;
pub mod player;

use std::sync::Arc;

use crate::client::SpotifyClient;
use crate::error::SpotgateError;
use crate::gate::GateDecision;
use crate::session::{FileSessionStore, Session};

/// Client plus the profile's session, shared by every subcommand.
pub struct CommandContext {
    pub client: SpotifyClient,
    pub session: Session,
}

impl CommandContext {
    pub fn open(config: Option<&str>, profile: &str) -> Result<Self, SpotgateError> {
        let client = SpotifyClient::from_config(config)?;
        let store = FileSessionStore::for_profile(profile);
        tracing::debug!(path = %store.path().display(), "using session file");
        Ok(Self {
            client,
            session: Session::new(Arc::new(store)),
        })
    }

    /// Run the auth gate for `path`, turning "must authenticate" into an error.
    pub async fn require_auth(&self, path: &str) -> Result<(), SpotgateError> {
        match self.client.gate(&self.session, path).await? {
            GateDecision::Proceed => Ok(()),
            GateDecision::Authenticate { .. } => Err(SpotgateError::NotAuthenticated),
        }
    }
}
