//! Signed cookie sessions.
//!
//! A session binds a browser to a user identity and rides in a
//! client-controlled cookie, so the representation is tamper-evident: the
//! cookie value is `base64(user_id) "." base64(hmac-sha256(payload))` under a
//! process-wide signing key. Verification is constant-time via
//! [`Mac::verify_slice`]. There is no server-side session table; expiry is
//! carried by the cookie's `Max-Age` and forgery is prevented by the MAC.

use std::sync::Arc;

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::info;

use crate::dashgate::config::Config;

pub const SESSION_COOKIE_NAME: &str = "dashgate_session";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
}

/// Request-scoped session handle inserted by the protected-route gate.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Session);

/// Process-wide session manager: mints, reads, and clears the signed cookie,
/// and applies the admin-bypass policy.
#[derive(Clone)]
pub struct Sessions {
    signing_key: Arc<SecretString>,
    ttl_seconds: i64,
    cookie_secure: bool,
    admin_mode: bool,
    admin_user_id: Arc<str>,
}

impl Sessions {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            signing_key: Arc::new(config.signing_key().clone()),
            ttl_seconds: config.session_ttl_seconds(),
            cookie_secure: config.cookie_secure(),
            admin_mode: config.admin_mode(),
            admin_user_id: Arc::from(config.admin_user_id()),
        }
    }

    /// Identity bound to the calling browser, if the request carries a valid
    /// session cookie. Missing, malformed, and tampered cookies all read as
    /// "no session".
    #[must_use]
    pub fn current(&self, headers: &HeaderMap) -> Option<Session> {
        let value = cookie_value(headers, SESSION_COOKIE_NAME)?;
        self.open(&value)
    }

    /// Resolve the request's session, applying admin bypass lazily.
    ///
    /// With admin mode off this is [`Sessions::current`]. With admin mode on
    /// and no session yet for this browser, a session for the configured
    /// admin identity is established on first touch; the returned cookie must
    /// be attached to the response so later requests reuse it.
    #[must_use]
    pub fn resolve(&self, headers: &HeaderMap) -> Option<(Session, Option<HeaderValue>)> {
        if let Some(session) = self.current(headers) {
            return Some((session, None));
        }
        if self.admin_mode {
            info!(user_id = %self.admin_user_id, "Admin bypass enabled, establishing operator session");
            let (session, cookie) = self.establish(&self.admin_user_id).ok()?;
            return Some((session, Some(cookie)));
        }
        None
    }

    /// Create a session for `user_id` and the `Set-Cookie` value carrying it.
    /// Re-establishing overwrites whatever session the browser held before.
    ///
    /// # Errors
    /// Returns an error if the cookie string is not a valid header value.
    pub fn establish(&self, user_id: &str) -> Result<(Session, HeaderValue), InvalidHeaderValue> {
        let session = Session {
            user_id: user_id.to_string(),
        };
        let sealed = self.seal(&session);
        let cookie = self.cookie(&sealed, self.ttl_seconds)?;
        Ok((session, cookie))
    }

    /// `Set-Cookie` value that removes the session cookie.
    ///
    /// # Errors
    /// Returns an error if the cookie string is not a valid header value.
    pub fn clear_cookie(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        self.cookie("", 0)
    }

    /// True iff `user_id` is the configured admin identity. Used to branch
    /// feature exposure only; it never short-circuits token redemption.
    #[must_use]
    pub fn is_admin(&self, user_id: &str) -> bool {
        user_id == &*self.admin_user_id
    }

    fn seal(&self, session: &Session) -> String {
        let payload = URL_SAFE_NO_PAD.encode(session.user_id.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(self.mac(&payload).finalize().into_bytes());
        format!("{payload}.{signature}")
    }

    fn open(&self, value: &str) -> Option<Session> {
        let (payload, signature) = value.split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        self.mac(payload).verify_slice(&signature).ok()?;

        let user_id = String::from_utf8(URL_SAFE_NO_PAD.decode(payload).ok()?).ok()?;
        if user_id.is_empty() {
            return None;
        }
        Some(Session { user_id })
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        // new_from_slice accepts keys of any length for HMAC.
        let mut mac = HmacSha256::new_from_slice(self.signing_key.expose_secret().as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC accepts any key length"));
        mac.update(payload.as_bytes());
        mac
    }

    fn cookie(&self, value: &str, max_age: i64) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{SESSION_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name {
            return Some(val.to_string());
        }
    }
    None
}
