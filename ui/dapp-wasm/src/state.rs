//! Page-lifetime state.
//!
//! `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! Holds the connector and the session produced by the last successful
//! connect; replaces the `window.account` / `window.*Contract` globals.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use kjc_api_types::ContractKind;
use kjc_connector::AppSession;
use serde::Serialize;

use crate::DappConnector;

#[derive(Default)]
pub struct AppState {
    pub connector: Option<Rc<DappConnector>>,
    pub session: Option<AppSession>,
    pub provider_listeners_bound: bool,
}

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
}

pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&AppState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

// ── Convenience accessors ──

pub fn connector() -> Option<Rc<DappConnector>> {
    with(|s| s.connector.clone())
}

pub fn set_connector(connector: DappConnector) {
    with_mut(|s| s.connector = Some(Rc::new(connector)));
}

pub fn session() -> Option<AppSession> {
    with(|s| s.session.clone())
}

pub fn set_session(session: AppSession) {
    with_mut(|s| s.session = Some(session));
}

pub fn clear_session() -> bool {
    with_mut(|s| s.session.take().is_some())
}

/// Returns `true` the first time only.
pub fn mark_provider_listeners_bound() -> bool {
    with_mut(|s| !std::mem::replace(&mut s.provider_listeners_bound, true))
}

// ── JS-facing view of the session ──

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub address: String,
    pub chain_id: String,
    pub connected: bool,
    pub usdt_decimals: u8,
    pub kjc_decimals: u8,
    pub decimals_fallback: bool,
    pub contracts: BTreeMap<&'static str, String>,
}

impl From<&AppSession> for SessionSummary {
    fn from(session: &AppSession) -> Self {
        Self {
            address: session.wallet.address.to_string(),
            chain_id: session.wallet.chain_id.to_string(),
            connected: session.wallet.connected,
            usdt_decimals: session.usdt_decimals.value,
            kjc_decimals: session.kjc_decimals.value,
            decimals_fallback: session.usdt_decimals.is_fallback()
                || session.kjc_decimals.is_fallback(),
            contracts: ContractKind::ALL
                .into_iter()
                .map(|kind| (kind.as_str(), session.contracts.get(kind).address().to_string()))
                .collect(),
        }
    }
}
