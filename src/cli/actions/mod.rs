mod run;

use std::net::IpAddr;

/// Action enum representing each possible command
#[derive(Debug)]
pub enum Action {
    Serve {
        listen: Option<IpAddr>,
        port: u16,
        /// Handshake bound in seconds
        timeout: u64,
        rdap_url: String,
    },
}

impl Action {
    /// Execute the action
    ///
    /// # Errors
    ///
    /// Returns an error if the action fails to execute
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
