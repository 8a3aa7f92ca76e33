use crate::cli::actions::{seed_token, server, Action};
use anyhow::{Context, Result};

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    if let Some(sub) = matches.subcommand_matches("seed-token") {
        return Ok(Action::SeedToken(seed_token::Args {
            store_address: sub
                .get_one::<String>("store-address")
                .cloned()
                .context("missing required argument: --store-address")?,
            user_id: sub
                .get_one::<String>("user-id")
                .cloned()
                .context("missing required argument: --user-id")?,
            ttl: sub.get_one::<u64>("ttl").copied().unwrap_or(300),
        }));
    }

    Ok(Action::Server(server::Args {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8050),
        store_address: matches
            .get_one::<String>("store-address")
            .cloned()
            .context("missing required argument: --store-address")?,
        signing_key: matches.get_one::<String>("session-signing-key").cloned(),
        admin_mode: matches.get_flag("admin"),
        admin_user_id: matches
            .get_one::<String>("admin-user-id")
            .cloned()
            .context("missing required argument: --admin-user-id")?,
        cookie_secure: matches.get_flag("cookie-secure"),
    }))
}
