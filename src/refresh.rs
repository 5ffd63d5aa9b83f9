//! Access-token refresh, serialized per session.
//!
//! Every refresh runs while holding the session's refresh guard. Callers
//! that find the record expired take the guard and re-read the record, so
//! concurrent requests on one expired session produce a single upstream
//! refresh and all observe its outcome.

use crate::error::SpotgateError;
use crate::oauth::TokenClient;
use crate::session::{Session, TokenRecord};

/// Refresh the session's access token now, whether or not it has expired.
///
/// Fails with [`SpotgateError::NoRefreshToken`] without calling upstream
/// when the session has nothing to refresh. Any upstream failure clears the
/// whole token record before the error is returned.
pub async fn refresh_session(
    tokens: &TokenClient,
    session: &Session,
) -> Result<TokenRecord, SpotgateError> {
    let _guard = session.lock_refresh().await;
    refresh_locked(tokens, session).await
}

/// Return a record whose access token is not expired, refreshing first if
/// needed.
pub async fn ensure_fresh(
    tokens: &TokenClient,
    session: &Session,
) -> Result<TokenRecord, SpotgateError> {
    let record = session.tokens().await?;
    if !record.is_expired() {
        return Ok(record);
    }

    let _guard = session.lock_refresh().await;

    // Another request may have refreshed while we waited for the guard.
    let record = session.tokens().await?;
    if !record.is_expired() {
        tracing::debug!("access token refreshed by a concurrent request");
        return Ok(record);
    }

    refresh_locked(tokens, session).await
}

/// Caller must hold the session's refresh guard.
async fn refresh_locked(
    tokens: &TokenClient,
    session: &Session,
) -> Result<TokenRecord, SpotgateError> {
    let mut record = session.tokens().await?;
    let refresh_token = match record.refresh_token.as_deref() {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => return Err(SpotgateError::NoRefreshToken),
    };

    tracing::debug!("refreshing access token");
    match tokens.refresh(&refresh_token).await {
        Ok(grant) => {
            let rotated = grant.refresh_token.is_some();
            record.apply(grant);
            session.set_tokens(record.clone()).await?;
            tracing::debug!(rotated, "access token refreshed");
            Ok(record)
        }
        Err(err) => {
            tracing::warn!(error = %err, "token refresh failed; clearing session tokens");
            session.clear_tokens().await?;
            Err(err)
        }
    }
}
