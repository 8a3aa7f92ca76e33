//! Credential store clients.
//!
//! The store is a shared key-value cache (Redis in production) holding
//! pending one-time sign-in tokens under `dash_token:<value>` keys, each
//! mapped to the user identity it authenticates and expiring via store-level
//! TTL. It is the only shared mutable resource in the system: server
//! processes do not share memory, so the single-use guarantee rests entirely
//! on the store's atomic get-and-delete primitive.
//!
//! The trait is object-safe (boxed futures) so handlers can hold an
//! `Arc<dyn CredentialStore>` and tests can swap in [`MemoryStore`], which
//! honors the same atomic contract.

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

use std::{future::Future, pin::Pin, time::Duration};
use thiserror::Error;

/// Key namespace for pending one-time tokens.
pub const TOKEN_KEY_PREFIX: &str = "dash_token:";

/// Upper bound for a single store round trip. On expiry the call fails
/// closed; callers must never treat a timeout as success.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
    #[error("credential store call timed out")]
    Timeout,
}

pub type StoreResult<T> = Result<T, StoreError>;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

pub trait CredentialStore: Send + Sync {
    /// Atomically fetch and delete the value under `key`.
    ///
    /// This is the redemption primitive: when two callers race on the same
    /// key, exactly one observes the value and the other observes `None`.
    /// Implementations must perform lookup and removal as one indivisible
    /// step; a separate read-then-delete is a correctness bug.
    fn take<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

    /// Fetch the value under `key` without consuming it.
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

    /// Write `value` under `key` with a store-enforced TTL.
    fn put<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> StoreFuture<'a, ()>;
}

/// Namespaced store key for a token value.
#[must_use]
pub fn token_key(token: &str) -> String {
    format!("{TOKEN_KEY_PREFIX}{token}")
}
