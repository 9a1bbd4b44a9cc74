use super::Action;
use crate::tls::ProbeSettings;
use std::time::Duration;

/// Execute the action's business logic by delegating to the appropriate module
pub async fn execute(action: Action) -> anyhow::Result<()> {
    match action {
        Action::Serve {
            listen,
            port,
            timeout,
            rdap_url,
        } => {
            let settings = ProbeSettings::with_timeout(Duration::from_secs(timeout));
            crate::server::start(listen, port, settings, &rdap_url).await
        }
    }
}
