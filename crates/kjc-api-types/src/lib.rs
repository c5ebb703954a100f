use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Precision assumed for a token whose `decimals()` call fails.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid address `{0}`: expected 0x followed by 40 hex digits")]
    InvalidAddress(String),
    #[error("invalid chain id `{0}`")]
    InvalidChainId(String),
}

/// An account or contract address.
///
/// Keeps the text the wallet or config supplied (checksummed or not) for
/// display and JSON-RPC, next to the parsed [`Address`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress {
    text: String,
    address: Address,
}

impl WalletAddress {
    /// Requires the `0x` prefix; checksum case is not enforced.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let trimmed = raw.trim();
        let Some(digits) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        else {
            return Err(TypeError::InvalidAddress(raw.to_owned()));
        };
        let address =
            Address::from_str(digits).map_err(|_| TypeError::InvalidAddress(raw.to_owned()))?;
        Ok(Self {
            text: format!("0x{digits}"),
            address,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Display form used by the status element: first 6 and last 4 characters.
    pub fn short(&self) -> String {
        shorten_address(&self.text)
    }
}

impl From<Address> for WalletAddress {
    fn from(address: Address) -> Self {
        Self {
            text: address.to_checksum(None),
            address,
        }
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = TypeError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.text
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// `0x1234567890abcdef...` → `0x1234...cdef`. Strings too short to shorten are returned as-is.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_owned();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Chain identifier in canonical EIP-695 form: lowercase hex, `0x` prefix, no leading zeros.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChainId(pub String);

impl ChainId {
    /// Accepts the hex string returned by `eth_chainId` or a decimal chain number.
    pub fn normalize(raw: &str) -> Result<Self, TypeError> {
        let trimmed = raw.trim();
        let value = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        }
        .map_err(|_| TypeError::InvalidChainId(raw.to_owned()))?;
        Ok(Self::from_number(value))
    }

    pub fn from_number(value: u64) -> Self {
        Self(format!("0x{value:x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── EIP-3085 / EIP-3326 request parameters ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddEthereumChainParameter {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SwitchEthereumChainParameter {
    pub chain_id: String,
}

/// Fixed description of a network the dApp requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParams {
    pub chain_id: &'static str,
    pub chain_name: &'static str,
    pub currency_name: &'static str,
    pub currency_symbol: &'static str,
    pub currency_decimals: u8,
    pub rpc_url: &'static str,
    pub explorer_url: &'static str,
}

pub const BSC_MAINNET: NetworkParams = NetworkParams {
    chain_id: "0x38",
    chain_name: "BNB Smart Chain",
    currency_name: "BNB",
    currency_symbol: "BNB",
    currency_decimals: 18,
    rpc_url: "https://bsc-dataseed.binance.org/",
    explorer_url: "https://bscscan.com/",
};

impl NetworkParams {
    pub fn chain_id(&self) -> ChainId {
        ChainId(self.chain_id.to_owned())
    }

    pub fn switch_parameter(&self) -> SwitchEthereumChainParameter {
        SwitchEthereumChainParameter {
            chain_id: self.chain_id.to_owned(),
        }
    }

    pub fn add_parameter(&self) -> AddEthereumChainParameter {
        AddEthereumChainParameter {
            chain_id: self.chain_id.to_owned(),
            chain_name: self.chain_name.to_owned(),
            native_currency: NativeCurrency {
                name: self.currency_name.to_owned(),
                symbol: self.currency_symbol.to_owned(),
                decimals: self.currency_decimals,
            },
            rpc_urls: vec![self.rpc_url.to_owned()],
            block_explorer_urls: vec![self.explorer_url.to_owned()],
        }
    }
}

// ── Session records ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletSession {
    pub address: WalletAddress,
    pub chain_id: ChainId,
    pub connected: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DecimalsSource {
    Fetched,
    Fallback,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenDecimals {
    pub value: u8,
    pub source: DecimalsSource,
}

impl TokenDecimals {
    pub fn fetched(value: u8) -> Self {
        Self {
            value,
            source: DecimalsSource::Fetched,
        }
    }

    pub fn fallback(value: u8) -> Self {
        Self {
            value,
            source: DecimalsSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DecimalsSource::Fallback
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    Staking,
    Router,
    Usdt,
    Kjc,
}

impl ContractKind {
    pub const ALL: [ContractKind; 4] = [
        ContractKind::Staking,
        ContractKind::Router,
        ContractKind::Usdt,
        ContractKind::Kjc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractKind::Staking => "staking",
            ContractKind::Router => "router",
            ContractKind::Usdt => "usdt",
            ContractKind::Kjc => "kjc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}
