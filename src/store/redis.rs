//! Redis-backed credential store.
//!
//! Uses a [`ConnectionManager`] (multiplexed, auto-reconnecting) so the
//! client is cheap to clone into request handlers. The atomic `take` maps to
//! the `GETDEL` command, which removes the key in the same step that reads
//! it, closing the replay window without a transaction.

use redis::aio::ConnectionManager;
use tokio::time::timeout;
use tracing::debug;

use super::{CredentialStore, StoreError, StoreFuture, StoreResult, STORE_TIMEOUT};

#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    /// Connect to the credential store at `address` (a `redis://` URL).
    ///
    /// # Errors
    /// Returns `StoreError::Unavailable` if the address does not parse or the
    /// initial connection fails.
    pub async fn connect(address: &str) -> StoreResult<Self> {
        let client =
            redis::Client::open(address).map_err(|err| StoreError::Unavailable(err.to_string()))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        debug!("Connected to credential store");
        Ok(Self { manager })
    }

    /// Run a command with the bounded store timeout.
    async fn run<T: redis::FromRedisValue>(&self, cmd: redis::Cmd) -> StoreResult<T> {
        let mut conn = self.manager.clone();
        let result: Result<T, redis::RedisError> =
            match timeout(STORE_TIMEOUT, async move { cmd.query_async(&mut conn).await }).await {
                Ok(result) => result,
                Err(_) => return Err(StoreError::Timeout),
            };
        result.map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

impl CredentialStore for RedisStore {
    fn take<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
        let mut cmd = redis::cmd("GETDEL");
        cmd.arg(key);
        Box::pin(async move { self.run(cmd).await })
    }

    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        Box::pin(async move { self.run(cmd).await })
    }

    fn put<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
        ttl: std::time::Duration,
    ) -> StoreFuture<'a, ()> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("EX").arg(ttl.as_secs().max(1));
        Box::pin(async move { self.run(cmd).await })
    }
}
