use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

/// Pure clap command definitions with zero business logic
#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("listen")
                .env("CERTVIEW_LISTEN")
                .help("IP address to bind to (default: [::]:port, accepts both IPv6 and IPv4)")
                .long("listen")
                .long_help(
                    "IP address to bind to:\n\
                    Not specified (default) binds to [::]:port which accepts both IPv6 and IPv4 connections.\n\
                    Falls back to 0.0.0.0:port if IPv6 is unavailable.\n\n\
                    Specific IPv4 examples: '0.0.0.0', '127.0.0.1'\n\
                    Specific IPv6: '::', '::1'"
                )
                .short('l')
                .value_name("IP"),
        )
        .arg(
            Arg::new("port")
                .default_value("8000")
                .env("CERTVIEW_PORT")
                .help("listening port for the web form and /api/check")
                .long("port")
                .short('p')
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("timeout")
                .default_value("10")
                .env("CERTVIEW_TIMEOUT")
                .help("seconds allowed for TCP connect + TLS handshake per diagnostic")
                .long("timeout")
                .short('t')
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("rdap-url")
                .default_value("https://rdap.org/")
                .env("CERTVIEW_RDAP_URL")
                .help("base URL of the RDAP service used for registry expiry lookups")
                .long("rdap-url")
                .value_name("URL"),
        )
}
