//! Service configuration.

use secrecy::SecretString;

/// Sentinel operator identity used when `ADMIN_USER_ID` is not configured.
pub const DEFAULT_ADMIN_USER_ID: &str = "7852511755";

const DEFAULT_SESSION_TTL_SECONDS: i64 = 12 * 60 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    store_address: String,
    signing_key: SecretString,
    admin_mode: bool,
    admin_user_id: String,
    session_ttl_seconds: i64,
    cookie_secure: bool,
}

impl Config {
    #[must_use]
    pub fn new(store_address: String, signing_key: SecretString) -> Self {
        Self {
            store_address,
            signing_key,
            admin_mode: false,
            admin_user_id: DEFAULT_ADMIN_USER_ID.to_string(),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            cookie_secure: false,
        }
    }

    #[must_use]
    pub fn with_admin_mode(mut self, enabled: bool) -> Self {
        self.admin_mode = enabled;
        self
    }

    #[must_use]
    pub fn with_admin_user_id(mut self, user_id: String) -> Self {
        self.admin_user_id = user_id;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn store_address(&self) -> &str {
        &self.store_address
    }

    #[must_use]
    pub fn signing_key(&self) -> &SecretString {
        &self.signing_key
    }

    #[must_use]
    pub fn admin_mode(&self) -> bool {
        self.admin_mode
    }

    #[must_use]
    pub fn admin_user_id(&self) -> &str {
        &self.admin_user_id
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}
