use crate::cli::actions::Action;
use anyhow::{Context, Result};
use clap::ArgMatches;
use std::net::IpAddr;

/// Convert `ArgMatches` into typed Action enum with validation
///
/// # Errors
///
/// Returns an error if the listen address is not a valid IP
pub fn dispatch(matches: &ArgMatches) -> Result<Action> {
    // Extract and validate listen address
    let listen = matches
        .get_one::<String>("listen")
        .map(|addr| {
            addr.parse::<IpAddr>()
                .with_context(|| format!("Invalid IP address: {addr}"))
        })
        .transpose()?;

    // Extract port with default
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8000);

    // Extract handshake timeout with default
    let timeout = matches.get_one::<u64>("timeout").copied().unwrap_or(10);

    // Extract RDAP base URL with default
    let rdap_url = matches
        .get_one::<String>("rdap-url")
        .cloned()
        .unwrap_or_else(|| "https://rdap.org/".to_string());

    Ok(Action::Serve {
        listen,
        port,
        timeout,
        rdap_url,
    })
}
