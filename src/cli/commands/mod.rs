mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("dashgate")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8050")
                .env("DASHGATE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("store-address")
                .short('s')
                .long("store-address")
                .help("Credential store connection string")
                .long_help(
                    "Credential store connection string, example: redis://:password@host:6379/0",
                )
                .default_value("redis://127.0.0.1:6379/0")
                .env("CREDENTIAL_STORE_ADDRESS")
                .global(true),
        )
        .arg(
            Arg::new("session-signing-key")
                .long("session-signing-key")
                .help("Key used to sign session cookies")
                .env("SESSION_SIGNING_KEY"),
        )
        .arg(
            Arg::new("admin")
                .long("admin")
                .help("Skip the token exchange and autologin as the admin user")
                .env("ADMIN_MODE")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("admin-user-id")
                .long("admin-user-id")
                .help("User id granted admin privileges")
                .default_value(crate::dashgate::config::DEFAULT_ADMIN_USER_ID)
                .env("ADMIN_USER_ID"),
        )
        .arg(
            Arg::new("cookie-secure")
                .long("cookie-secure")
                .help("Mark session cookies Secure (HTTPS only)")
                .env("DASHGATE_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("seed-token")
                .about(
                    "Write a one-time sign-in token to the credential store and print the link path",
                )
                .arg(
                    Arg::new("user-id")
                        .short('u')
                        .long("user-id")
                        .help("User id the token signs in")
                        .required(true),
                )
                .arg(
                    Arg::new("ttl")
                        .short('t')
                        .long("ttl")
                        .help("Token lifetime in seconds")
                        .default_value("300")
                        .value_parser(clap::value_parser!(u64)),
                ),
        );

    logging::with_args(command)
}
