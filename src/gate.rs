use crate::error::SpotgateError;
use crate::oauth::TokenClient;
use crate::refresh::ensure_fresh;
use crate::session::Session;

/// Paths that must stay reachable without a session.
pub const PUBLIC_PATHS: &[&str] = &["/login", "/callback"];

/// Outcome of guarding one protected request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    /// Send the user through the authorization flow; `return_to` has been
    /// recorded on the session for after the login.
    Authenticate { return_to: String },
}

impl GateDecision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GateDecision::Proceed)
    }
}

/// Decide whether a request for `path` may run on this session.
///
/// A session without a refresh token must authenticate. An expired session
/// is refreshed in place; if that fails the session must authenticate.
/// Session store errors are returned as-is.
pub async fn check(
    tokens: &TokenClient,
    session: &Session,
    path: &str,
) -> Result<GateDecision, SpotgateError> {
    if PUBLIC_PATHS.contains(&path) {
        return Ok(GateDecision::Proceed);
    }

    let record = session.tokens().await?;
    if !record.has_refresh_token() {
        tracing::debug!(path, "no refresh token; authentication required");
        return must_authenticate(session, path).await;
    }

    if record.is_expired() {
        match ensure_fresh(tokens, session).await {
            Ok(_) => {}
            Err(err @ (SpotgateError::Refresh { .. } | SpotgateError::NoRefreshToken)) => {
                tracing::debug!(path, error = %err, "refresh failed; authentication required");
                return must_authenticate(session, path).await;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(GateDecision::Proceed)
}

async fn must_authenticate(
    session: &Session,
    path: &str,
) -> Result<GateDecision, SpotgateError> {
    session.set_return_to(path).await?;
    Ok(GateDecision::Authenticate {
        return_to: path.to_string(),
    })
}
