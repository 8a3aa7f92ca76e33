//! Local stand-in for the bot that normally seeds sign-in tokens.

use std::time::Duration;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use tracing::info;

use crate::store::{token_key, CredentialStore, RedisStore};

#[derive(Debug)]
pub struct Args {
    pub store_address: String,
    pub user_id: String,
    pub ttl: u64,
}

/// Execute the seed-token action.
/// # Errors
/// Returns an error if the store is unreachable or the write fails.
pub async fn execute(args: Args) -> Result<()> {
    let store = RedisStore::connect(&args.store_address)
        .await
        .context("Failed to connect to the credential store")?;

    let token = generate_token()?;
    store
        .put(
            &token_key(&token),
            &args.user_id,
            Duration::from_secs(args.ttl),
        )
        .await
        .context("Failed to write the token")?;

    info!(
        user_id = %args.user_id,
        ttl = args.ttl,
        "Seeded one-time sign-in token"
    );
    println!("/auth?token={token}");

    Ok(())
}

/// Raw token handed to the user; the store keys on it directly and the value
/// disappears on first redemption.
fn generate_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate token")?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
