//! Wallet connection for the KJC staking dApp.
//!
//! Platform-independent: the browser crate supplies a `WalletProvider`,
//! a `StatusView` and `UiRefresh`; tests supply mocks.

pub mod config;
pub mod connector;
pub mod error;
pub mod messages;

pub use config::{ConfigError, ContractConfig, ValidatedConfig};
pub use connector::{AppSession, StatusView, UiRefresh, WalletConnector, build_contracts, fetch_decimals};
pub use error::{ConnectError, friendly_message};

#[cfg(test)]
mod tests;
