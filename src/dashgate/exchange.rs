//! One-time token redemption.
//!
//! Converts a token carried in a sign-in link into the user identity it
//! authenticates, consuming it in the same atomic store operation. Never
//! issued, already redeemed, and expired tokens are deliberately
//! indistinguishable to the caller; the concrete cause is only logged
//! server-side. Nothing here retries: a failed redemption means the user has
//! to request a fresh link, which bounds the guesses an attacker gets per
//! token.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::store::{token_key, CredentialStore};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("token not provided")]
    MissingToken,
    #[error("invalid or expired sign-in link")]
    InvalidOrExpiredToken,
    #[error("credential store unavailable")]
    StoreUnavailable,
}

/// Redeem a one-time token for the user identity bound to it.
///
/// The token is removed from the store as part of the same atomic step that
/// reads it: under concurrent attempts on the same token, exactly one caller
/// gets `Ok` and the rest get `InvalidOrExpiredToken`. Store failures and
/// timeouts fail closed as `StoreUnavailable`; by the time the store mutation
/// has committed the token counts as consumed regardless of whether the
/// response is ever delivered.
///
/// # Errors
/// - `MissingToken` when `token` is empty.
/// - `InvalidOrExpiredToken` when no value exists for the token (never
///   issued, already redeemed, or expired all map here).
/// - `StoreUnavailable` when the store call fails or times out.
pub async fn redeem(store: &dyn CredentialStore, token: &str) -> Result<String, ExchangeError> {
    if token.is_empty() {
        return Err(ExchangeError::MissingToken);
    }

    match store.take(&token_key(token)).await {
        Ok(Some(user_id)) => {
            info!(user_id = %user_id, "One-time token redeemed");
            Ok(user_id)
        }
        Ok(None) => {
            warn!(
                token_prefix = token_prefix(token),
                "Token not found in credential store: never issued, already redeemed, or expired"
            );
            Err(ExchangeError::InvalidOrExpiredToken)
        }
        Err(err) => {
            error!("Credential store error during redemption, failing closed: {err}");
            Err(ExchangeError::StoreUnavailable)
        }
    }
}

// Enough of the token to correlate log lines, never the full credential.
fn token_prefix(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}
