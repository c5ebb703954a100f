//! Contract addresses and ABIs supplied by the page's `config.json`.
//!
//! Keys keep the names the dApp's deployment config has always used
//! (`contractAddress`, `stakingABI`, ...). Every field is optional at parse
//! time; `validate` decides whether the set is usable.

use kjc_abi::Abi;
use kjc_api_types::WalletAddress;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("{key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("config.json: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContractConfig {
    #[serde(default, rename = "contractAddress")]
    pub staking_address: Option<String>,
    #[serde(default, rename = "usdtAddress")]
    pub usdt_address: Option<String>,
    #[serde(default, rename = "kjcAddress")]
    pub kjc_address: Option<String>,
    #[serde(default, rename = "routerAddress")]
    pub router_address: Option<String>,
    #[serde(default, rename = "stakingABI")]
    pub staking_abi: Option<serde_json::Value>,
    #[serde(default, rename = "usdtABI")]
    pub usdt_abi: Option<serde_json::Value>,
}

/// A configuration in which every address and ABI is present and well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub staking_address: WalletAddress,
    pub usdt_address: WalletAddress,
    pub kjc_address: WalletAddress,
    pub router_address: WalletAddress,
    pub staking_abi: Abi,
    pub usdt_abi: Abi,
}

impl ContractConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Names of the keys that are absent (or JSON `null`).
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let present = [
            ("stakingABI", self.staking_abi.as_ref().is_some_and(|v| !v.is_null())),
            ("usdtABI", self.usdt_abi.as_ref().is_some_and(|v| !v.is_null())),
            ("contractAddress", self.staking_address.is_some()),
            ("kjcAddress", self.kjc_address.is_some()),
            ("usdtAddress", self.usdt_address.is_some()),
            ("routerAddress", self.router_address.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(key, ok)| (!ok).then_some(key))
            .collect()
    }

    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let missing = self.missing_keys();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(ValidatedConfig {
            staking_address: address("contractAddress", &self.staking_address)?,
            usdt_address: address("usdtAddress", &self.usdt_address)?,
            kjc_address: address("kjcAddress", &self.kjc_address)?,
            router_address: address("routerAddress", &self.router_address)?,
            staking_abi: abi("stakingABI", &self.staking_abi)?,
            usdt_abi: abi("usdtABI", &self.usdt_abi)?,
        })
    }
}

fn address(key: &'static str, value: &Option<String>) -> Result<WalletAddress, ConfigError> {
    let raw = value.as_deref().ok_or(ConfigError::Missing(vec![key]))?;
    WalletAddress::parse(raw).map_err(|err| ConfigError::Invalid {
        key,
        reason: err.to_string(),
    })
}

fn abi(key: &'static str, value: &Option<serde_json::Value>) -> Result<Abi, ConfigError> {
    let raw = value.clone().ok_or(ConfigError::Missing(vec![key]))?;
    Abi::from_value(raw).map_err(|err| ConfigError::Invalid {
        key,
        reason: format!("{err:#}"),
    })
}
