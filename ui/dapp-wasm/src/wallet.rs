//! The connect-wallet action as the page sees it.

use kjc_connector::{AppSession, ConnectError, StatusView, messages};
use tracing::{info, warn};

use crate::DappConnector;
use crate::provider::Eip1193Provider;
use crate::state;
use crate::status::DomStatus;

pub async fn connect(connector: &DappConnector) -> Result<AppSession, ConnectError> {
    let provider = Eip1193Provider::detect();
    let result = connector.connect(provider.as_ref()).await;
    if let (Ok(_), Some(provider)) = (&result, &provider) {
        watch_provider(provider, connector.status().clone());
    }
    result
}

/// Drop the stored session whenever the wallet switches account or network.
fn watch_provider(provider: &Eip1193Provider, status: DomStatus) {
    if !state::mark_provider_listeners_bound() {
        return;
    }
    for event in ["accountsChanged", "chainChanged"] {
        let status = status.clone();
        let registered = provider.on(event, move |_| {
            on_wallet_changed(event, &status);
        });
        if let Err(err) = registered {
            warn!(event, error = ?err, "could not subscribe to provider event");
        }
    }
}

/// Returns whether a session was dropped. Repeated events after the first are no-ops.
pub(crate) fn on_wallet_changed<V: StatusView>(event: &str, status: &V) -> bool {
    if !state::clear_session() {
        return false;
    }
    info!(event, "wallet changed; session cleared");
    status.show_progress(messages::WALLET_CHANGED);
    true
}
