use crate::dashgate::{self, config::Config};
use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use secrecy::SecretString;
use tracing::{info, warn};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub store_address: String,
    pub signing_key: Option<String>,
    pub admin_mode: bool,
    pub admin_user_id: String,
    pub cookie_secure: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the store connection or the listener fails.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let signing_key = match args.signing_key {
        Some(key) => SecretString::from(key),
        None => {
            // Sessions signed with an ephemeral key die with the process.
            warn!(
                "SESSION_SIGNING_KEY is not set, using a randomly generated key. \
                 All sessions will be invalidated on restart. \
                 Set SESSION_SIGNING_KEY in production."
            );
            SecretString::from(generate_key()?)
        }
    };

    let config = Config::new(args.store_address, signing_key)
        .with_admin_mode(args.admin_mode)
        .with_admin_user_id(args.admin_user_id)
        .with_cookie_secure(args.cookie_secure);

    if config.admin_mode() {
        warn!(
            admin_user_id = %config.admin_user_id(),
            "Admin mode is enabled, protected routes autologin as the admin user"
        );
    }

    dashgate::new(args.port, config).await
}

fn generate_key() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session signing key")?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("store_address", redact_store_address(&args.store_address)),
        ("signing_key_set", args.signing_key.is_some().to_string()),
        ("admin_mode", args.admin_mode.to_string()),
        ("admin_user_id", args.admin_user_id.clone()),
        ("cookie_secure", args.cookie_secure.to_string()),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = String::from("Startup configuration:");
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn redact_store_address(address: &str) -> String {
    match Url::parse(address) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-store-address".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_the_store_password() {
        let redacted = redact_store_address("redis://:hunter2@store.internal:6379/0");
        assert!(!redacted.contains("hunter2"));
        assert!(redacted.contains("REDACTED"));
        assert!(redacted.contains("store.internal"));
    }

    #[test]
    fn leaves_passwordless_addresses_alone() {
        let redacted = redact_store_address("redis://127.0.0.1:6379/0");
        assert_eq!(redacted, "redis://127.0.0.1:6379/0");
    }

    #[test]
    fn flags_unparseable_addresses() {
        assert_eq!(redact_store_address("not a url"), "invalid-store-address");
    }

    #[test]
    fn generated_keys_are_random() {
        let first = generate_key().expect("key");
        let second = generate_key().expect("key");
        assert_ne!(first, second);
        assert!(!first.is_empty());
    }
}
