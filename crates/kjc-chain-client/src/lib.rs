use async_trait::async_trait;
use kjc_abi::{Abi, DynSolValue, hex};
use kjc_api_types::{
    AddEthereumChainParameter, ChainId, ContractKind, SwitchEthereumChainParameter, WalletAddress,
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

/// EIP-1193 error codes the connector reacts to.
pub mod codes {
    pub const USER_REJECTED: i64 = 4001;
    pub const UNAUTHORIZED: i64 = 4100;
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    pub const REQUEST_PENDING: i64 = -32002;
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("wallet provider error{}: {message}", .code.map(|c| format!(" {c}")).unwrap_or_default())]
pub struct ProviderError {
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn is_code(&self, code: i64) -> bool {
        self.code == Some(code)
    }
}

/// An EIP-1193 provider (`window.ethereum` in the browser).
///
/// Implementors only supply `request`; the typed helpers build the JSON-RPC
/// parameters and parse results.
#[async_trait(?Send)]
pub trait WalletProvider {
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, ProviderError>;

    /// `eth_requestAccounts`: may prompt the user.
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        let value = self.request("eth_requestAccounts", None).await?;
        parse_accounts(value)
    }

    /// `eth_accounts`: accounts already authorized for this origin.
    async fn accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        let value = self.request("eth_accounts", None).await?;
        parse_accounts(value)
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        let value = self.request("eth_chainId", None).await?;
        let raw = match &value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => return Err(ProviderError::other(format!("unexpected chain id {other}"))),
        };
        ChainId::normalize(&raw).map_err(|err| ProviderError::other(err.to_string()))
    }

    async fn switch_chain(&self, param: &SwitchEthereumChainParameter) -> Result<(), ProviderError> {
        let params = serde_json::to_value([param])
            .map_err(|err| ProviderError::other(err.to_string()))?;
        self.request("wallet_switchEthereumChain", Some(params)).await?;
        Ok(())
    }

    async fn add_chain(&self, param: &AddEthereumChainParameter) -> Result<(), ProviderError> {
        let params = serde_json::to_value([param])
            .map_err(|err| ProviderError::other(err.to_string()))?;
        self.request("wallet_addEthereumChain", Some(params)).await?;
        Ok(())
    }

    /// `eth_call` against the latest block; returns the raw return data.
    async fn call(&self, to: &WalletAddress, data: &[u8]) -> Result<Vec<u8>, ProviderError> {
        let params = json!([
            { "to": to.as_str(), "data": hex::encode_prefixed(data) },
            "latest"
        ]);
        let value = self.request("eth_call", Some(params)).await?;
        let text = value
            .as_str()
            .ok_or_else(|| ProviderError::other(format!("unexpected eth_call result {value}")))?;
        hex::decode(text.trim())
            .map_err(|err| ProviderError::other(format!("invalid eth_call result: {err}")))
    }
}

fn parse_accounts(value: Value) -> Result<Vec<WalletAddress>, ProviderError> {
    let Value::Array(items) = value else {
        return Err(ProviderError::other(format!("unexpected accounts result {value}")));
    };
    items
        .iter()
        .map(|item| {
            let raw = item
                .as_str()
                .ok_or_else(|| ProviderError::other(format!("unexpected account {item}")))?;
            WalletAddress::parse(raw).map_err(|err| ProviderError::other(err.to_string()))
        })
        .collect()
}

// ── Contract clients ──

#[derive(Debug, Error)]
pub enum ContractError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("{kind} contract: {message}")]
    Abi { kind: &'static str, message: String },
}

/// A contract address bound to its ABI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractClient {
    kind: ContractKind,
    address: WalletAddress,
    abi: Abi,
}

impl ContractClient {
    pub fn new(kind: ContractKind, address: WalletAddress, abi: Abi) -> Self {
        Self { kind, address, abi }
    }

    pub fn kind(&self) -> ContractKind {
        self.kind
    }

    pub fn address(&self) -> &WalletAddress {
        &self.address
    }

    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    pub fn encode_call(
        &self,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<u8>, ContractError> {
        self.abi
            .encode_call(function, args)
            .map_err(|source| self.abi_error(source))
    }

    /// Read-only call; returns raw ABI-encoded return data.
    pub async fn call<P>(
        &self,
        provider: &P,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<u8>, ContractError>
    where
        P: WalletProvider + ?Sized,
    {
        let data = self.encode_call(function, args)?;
        debug!(contract = self.kind.as_str(), function, "eth_call");
        Ok(provider.call(&self.address, &data).await?)
    }

    /// `call` followed by decoding the return data against the ABI's outputs.
    pub async fn read<P>(
        &self,
        provider: &P,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, ContractError>
    where
        P: WalletProvider + ?Sized,
    {
        let data = self.call(provider, function, args).await?;
        self.abi
            .decode_output(function, &data)
            .map_err(|source| self.abi_error(source))
    }

    pub async fn decimals<P>(&self, provider: &P) -> Result<u8, ContractError>
    where
        P: WalletProvider + ?Sized,
    {
        let values = self.read(provider, "decimals", &[]).await?;
        let value = kjc_abi::single_uint(&values).map_err(|source| self.abi_error(source))?;
        u8::try_from(value)
            .map_err(|_| self.abi_error(anyhow::anyhow!("decimals {value} out of range")))
    }

    fn abi_error(&self, source: anyhow::Error) -> ContractError {
        ContractError::Abi {
            kind: self.kind.as_str(),
            message: format!("{source:#}"),
        }
    }
}

/// The four contract bindings the dApp works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSet {
    pub staking: ContractClient,
    pub router: ContractClient,
    pub usdt: ContractClient,
    pub kjc: ContractClient,
}

impl ContractSet {
    pub fn get(&self, kind: ContractKind) -> &ContractClient {
        match kind {
            ContractKind::Staking => &self.staking,
            ContractKind::Router => &self.router,
            ContractKind::Usdt => &self.usdt,
            ContractKind::Kjc => &self.kjc,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContractClient> {
        ContractKind::ALL.into_iter().map(|kind| self.get(kind))
    }
}
