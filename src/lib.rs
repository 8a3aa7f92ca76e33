//! # Dashgate (One-Time Link Gateway)
//!
//! `dashgate` is a small HTTP service that gates a web dashboard behind a
//! hand-off authentication scheme. An external bot issues a short-lived,
//! single-use token and writes it to a shared credential store (Redis); the
//! user clicks a sign-in link carrying that token; `dashgate` exchanges the
//! token **exactly once** for a signed, cookie-carried browser session.
//!
//! The exchange is the hard part and the reason this service exists:
//!
//! 1. **At-most-once redemption.** The lookup-and-delete against the store is
//!    a single atomic step (Redis `GETDEL`). Under concurrent requests
//!    presenting the same token, exactly one wins; replayed links and
//!    double-clicks lose.
//! 2. **Crawler screening.** Messaging platforms prefetch links to render
//!    previews. Those requests are answered with a neutral 200 and never
//!    touch the store, so a preview fetch cannot burn a human's token.
//! 3. **Fail closed.** Store timeouts and connection failures surface as the
//!    same generic "invalid or expired link" response; no internal detail
//!    leaks to the caller.
//!
//! Dashboard pages themselves are out of scope here: the `/app` subtree is a
//! protected prefix guarded by one crosscutting middleware, and what renders
//! behind it is somebody else's problem.

pub mod cli;
pub mod dashgate;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
