pub mod record;
pub mod store;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::error::SpotgateError;

pub use record::{AuthStatus, TokenGrant, TokenRecord};
pub use store::{FileSessionStore, MemorySessionStore, SessionData, SessionStore};

/// One user's session: the store holding its tokens plus the guard that
/// serializes token refreshes for it.
///
/// Tokens are always read from the store; nothing here caches a copy.
/// Every write is a load-modify-save under `write_lock`, so updates to
/// different fields from concurrent requests do not overwrite each other.
/// Share a `Session` between concurrent requests with `Arc<Session>`.
#[derive(Debug)]
pub struct Session {
    store: Arc<dyn SessionStore>,
    refresh_lock: Mutex<()>,
    write_lock: Mutex<()>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            refresh_lock: Mutex::new(()),
            write_lock: Mutex::new(()),
        }
    }

    /// Session backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    pub async fn tokens(&self) -> Result<TokenRecord, SpotgateError> {
        Ok(self.store.load().await?.tokens)
    }

    pub async fn set_tokens(&self, tokens: TokenRecord) -> Result<(), SpotgateError> {
        self.update(|data| data.tokens = tokens).await
    }

    pub async fn clear_tokens(&self) -> Result<(), SpotgateError> {
        self.update(|data| data.tokens.clear()).await
    }

    pub async fn set_return_to(&self, path: &str) -> Result<(), SpotgateError> {
        self.update(|data| data.return_to = Some(path.to_string()))
            .await
    }

    /// Remove and return the recorded post-login path.
    pub async fn take_return_to(&self) -> Result<Option<String>, SpotgateError> {
        self.update(|data| data.return_to.take()).await
    }

    /// Drop tokens and any pending return path.
    pub async fn reset(&self) -> Result<(), SpotgateError> {
        self.update(|data| *data = SessionData::default()).await
    }

    async fn update<T>(
        &self,
        apply: impl FnOnce(&mut SessionData) -> T,
    ) -> Result<T, SpotgateError> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.store.load().await?;
        let out = apply(&mut data);
        self.store.save(&data).await?;
        Ok(out)
    }

    /// Held for the whole duration of a token refresh.
    pub(crate) async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh_lock.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_tokens_keeps_return_to() {
        let session = Session::in_memory();
        session.set_return_to("/overview").await.unwrap();
        session
            .set_tokens(TokenRecord {
                access_token: Some("AT".into()),
                refresh_token: None,
                expires_at: None,
            })
            .await
            .unwrap();

        assert_eq!(
            session.tokens().await.unwrap().access_token.as_deref(),
            Some("AT")
        );
        assert_eq!(
            session.take_return_to().await.unwrap().as_deref(),
            Some("/overview")
        );
        assert_eq!(session.take_return_to().await.unwrap(), None);
    }

    /// Yields between load and save so interleaved writers would race.
    #[derive(Default)]
    struct SlowStore {
        inner: MemorySessionStore,
    }

    #[async_trait::async_trait]
    impl SessionStore for SlowStore {
        async fn load(&self) -> Result<SessionData, SpotgateError> {
            let data = self.inner.load().await?;
            tokio::task::yield_now().await;
            Ok(data)
        }

        async fn save(&self, data: &SessionData) -> Result<(), SpotgateError> {
            tokio::task::yield_now().await;
            self.inner.save(data).await
        }
    }

    #[tokio::test]
    async fn concurrent_field_writes_are_both_kept() {
        let session = Session::new(Arc::new(SlowStore::default()));
        let tokens = TokenRecord {
            access_token: Some("AT2".into()),
            refresh_token: Some("RT1".into()),
            expires_at: None,
        };

        let (a, b) = tokio::join!(
            session.set_tokens(tokens.clone()),
            session.set_return_to("/top"),
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(session.tokens().await.unwrap(), tokens);
        assert_eq!(session.take_return_to().await.unwrap().as_deref(), Some("/top"));
    }

    #[tokio::test]
    async fn clear_tokens_keeps_return_to() {
        let session = Session::new(Arc::new(MemorySessionStore::with_tokens(TokenRecord {
            access_token: Some("AT".into()),
            refresh_token: Some("RT".into()),
            expires_at: None,
        })));
        session.set_return_to("/pause").await.unwrap();
        session.clear_tokens().await.unwrap();

        assert_eq!(session.tokens().await.unwrap(), TokenRecord::default());
        assert_eq!(session.take_return_to().await.unwrap().as_deref(), Some("/pause"));
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let store = Arc::new(MemorySessionStore::with_tokens(TokenRecord {
            access_token: Some("AT".into()),
            refresh_token: Some("RT".into()),
            expires_at: None,
        }));
        let session = Session::new(store.clone());
        session.set_return_to("/pause").await.unwrap();
        session.reset().await.unwrap();
        assert_eq!(store.load().await.unwrap(), SessionData::default());
    }
}
