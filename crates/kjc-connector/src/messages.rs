//! User-facing text for the status element and alerts.

pub const CONNECTING: &str = "Connecting...";
pub const CONNECTED_MARK: &str = "\u{2705}";
pub const NO_WALLET: &str = "\u{274c} Wallet extension not found";
pub const CONNECTION_FAILED: &str = "\u{274c} Connection failed";
pub const CONFIG_FAILED: &str = "\u{274c} Connection failed: config error";
pub const CONFIG_INCOMPLETE: &str = "\u{274c} Contract configuration is incomplete";
pub const INSTALL_WALLET: &str =
    "Please install MetaMask or Bitget Wallet, or open this dApp in your wallet app's browser";

pub fn switch_manually(chain_name: &str) -> String {
    format!("\u{274c} Please switch to {chain_name} manually")
}

pub fn add_manually(chain_name: &str) -> String {
    format!("\u{274c} Please add {chain_name} manually")
}

pub fn connection_failed(reason: &str) -> String {
    format!("{CONNECTION_FAILED}: {reason}")
}

pub const WALLET_CHANGED: &str = "Wallet account or network changed, please reconnect";
