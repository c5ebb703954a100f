//! KJC staking dApp: wallet connection frontend (Rust + WASM).
//!
//! Binds `window.ethereum` and the `#walletAddress` status element to the
//! platform-independent `kjc-connector` flow.

pub mod api;
pub mod dom;
pub mod events;
pub mod logging;
pub mod provider;
pub mod state;
pub mod status;
pub mod wallet;

use kjc_api_types::ContractKind;
use kjc_connector::{WalletConnector, friendly_message};
use tracing::info;
use wasm_bindgen::prelude::*;

use crate::state::SessionSummary;
use crate::status::{DomStatus, SessionHooks};

pub type DappConnector = WalletConnector<DomStatus, SessionHooks>;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    let config = api::load_config(api::CONFIG_URL).await;
    state::set_connector(WalletConnector::new(
        config,
        DomStatus::new(els.wallet_address.clone()),
        SessionHooks,
    ));

    events::bind_events(&els);

    info!("wallet connector ready");
    Ok(())
}

// ── JS exports ──

/// Run the connect flow; resolves with the session summary.
#[wasm_bindgen(js_name = connectWallet)]
pub async fn connect_wallet() -> Result<JsValue, JsValue> {
    let connector = state::connector()
        .ok_or_else(|| JsValue::from_str("wallet connector not initialised"))?;
    match wallet::connect(&connector).await {
        Ok(session) => Ok(serde_wasm_bindgen::to_value(&SessionSummary::from(&session))?),
        Err(err) => Err(JsValue::from_str(&friendly_message(&err))),
    }
}

/// Current session summary, or `undefined` when not connected.
#[wasm_bindgen(js_name = session)]
pub fn session() -> Result<JsValue, JsValue> {
    match state::session() {
        Some(session) => Ok(serde_wasm_bindgen::to_value(&SessionSummary::from(&session))?),
        None => Ok(JsValue::UNDEFINED),
    }
}

#[wasm_bindgen(js_name = walletAddress)]
pub fn wallet_address() -> Option<String> {
    state::session().map(|s| s.wallet.address.to_string())
}

#[wasm_bindgen(js_name = usdtDecimals)]
pub fn usdt_decimals() -> Option<u8> {
    state::session().map(|s| s.usdt_decimals.value)
}

#[wasm_bindgen(js_name = kjcDecimals)]
pub fn kjc_decimals() -> Option<u8> {
    state::session().map(|s| s.kjc_decimals.value)
}

/// Address of `staking`, `router`, `usdt` or `kjc` in the current session.
#[wasm_bindgen(js_name = contractAddress)]
pub fn contract_address(kind: &str) -> Option<String> {
    let kind = ContractKind::parse(kind)?;
    state::session().map(|s| s.contracts.get(kind).address().to_string())
}
