use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token triple stored against one user session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Fresh credentials returned by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// Nothing to refresh; only a new authorization can help.
    Unauthenticated,
    Authenticated,
    /// Access token expired or missing, but a refresh token is available.
    Expired,
}

impl TokenRecord {
    /// Expired when `expires_at` is absent or `now` has reached it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => true,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// The access token, only if it is present and not expired at `now`.
    pub fn usable_access_token(&self, now: DateTime<Utc>) -> Option<&str> {
        if self.is_expired_at(now) {
            return None;
        }
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// True for a record that never held credentials, or was cleared.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> AuthStatus {
        if self.usable_access_token(now).is_some() {
            AuthStatus::Authenticated
        } else if self.has_refresh_token() {
            AuthStatus::Expired
        } else {
            AuthStatus::Unauthenticated
        }
    }

    /// Install a grant. The stored refresh token is only replaced when the
    /// grant carries a new one.
    pub fn apply(&mut self, grant: TokenGrant) {
        self.access_token = Some(grant.access_token);
        self.expires_at = Some(grant.expires_at);
        if let Some(refresh) = grant.refresh_token {
            self.refresh_token = Some(refresh);
        }
    }

    pub fn clear(&mut self) {
        *self = TokenRecord::default();
    }
}

impl From<TokenGrant> for TokenRecord {
    fn from(grant: TokenGrant) -> Self {
        let mut record = TokenRecord::default();
        record.apply(grant);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_at: Option<DateTime<Utc>>) -> TokenRecord {
        TokenRecord {
            access_token: Some("AT".into()),
            refresh_token: Some("RT".into()),
            expires_at,
        }
    }

    #[test]
    fn expired_when_expiry_absent() {
        assert!(record(None).is_expired_at(Utc::now()));
        assert!(TokenRecord::default().is_expired());
    }

    #[test]
    fn expired_when_in_the_past() {
        let now = Utc::now();
        assert!(record(Some(now - Duration::seconds(1))).is_expired_at(now));
        assert!(record(Some(now - Duration::hours(5))).is_expired_at(now));
    }

    #[test]
    fn expired_exactly_at_expiry_instant() {
        let now = Utc::now();
        assert!(record(Some(now)).is_expired_at(now));
    }

    #[test]
    fn not_expired_when_strictly_in_the_future() {
        let now = Utc::now();
        assert!(!record(Some(now + Duration::milliseconds(1))).is_expired_at(now));
        assert!(!record(Some(now + Duration::hours(1))).is_expired());
    }

    #[test]
    fn usable_token_requires_both_fields() {
        let now = Utc::now();
        let mut rec = record(Some(now + Duration::hours(1)));
        assert_eq!(rec.usable_access_token(now), Some("AT"));

        rec.access_token = None;
        assert_eq!(rec.usable_access_token(now), None);

        let rec = record(None);
        assert_eq!(rec.usable_access_token(now), None);
    }

    #[test]
    fn apply_keeps_refresh_token_when_grant_has_none() {
        let now = Utc::now();
        let mut rec = record(Some(now - Duration::hours(1)));
        rec.apply(TokenGrant {
            access_token: "AT2".into(),
            refresh_token: None,
            expires_at: now + Duration::hours(1),
        });
        assert_eq!(rec.access_token.as_deref(), Some("AT2"));
        assert_eq!(rec.refresh_token.as_deref(), Some("RT"));
        assert_eq!(rec.expires_at, Some(now + Duration::hours(1)));
    }

    #[test]
    fn apply_replaces_refresh_token_when_rotated() {
        let now = Utc::now();
        let mut rec = record(Some(now - Duration::hours(1)));
        rec.apply(TokenGrant {
            access_token: "AT2".into(),
            refresh_token: Some("RT2".into()),
            expires_at: now + Duration::hours(1),
        });
        assert_eq!(rec.refresh_token.as_deref(), Some("RT2"));
    }

    #[test]
    fn clear_resets_all_fields() {
        let mut rec = record(Some(Utc::now()));
        rec.clear();
        assert_eq!(rec, TokenRecord::default());
        assert!(rec.is_empty());
    }

    #[test]
    fn status_transitions() {
        let now = Utc::now();
        assert_eq!(
            TokenRecord::default().status_at(now),
            AuthStatus::Unauthenticated
        );
        assert_eq!(
            record(Some(now + Duration::hours(1))).status_at(now),
            AuthStatus::Authenticated
        );
        assert_eq!(
            record(Some(now - Duration::hours(1))).status_at(now),
            AuthStatus::Expired
        );
    }

    #[test]
    fn record_deserializes_from_empty_object() {
        let rec: TokenRecord = serde_json::from_str("{}").unwrap();
        assert!(rec.is_empty());
        assert!(rec.expires_at.is_none());
    }
}
