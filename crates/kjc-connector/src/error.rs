use kjc_chain_client::{ProviderError, codes};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConnectError {
    #[error("no wallet provider found")]
    ProviderMissing,
    #[error("a connection attempt is already in progress")]
    AlreadyConnecting,
    #[error("request rejected by user")]
    Rejected(#[source] ProviderError),
    #[error("wallet returned no accounts")]
    NoAccounts,
    #[error("could not switch to chain {chain}: {source}")]
    NetworkSwitch { chain: String, source: ProviderError },
    #[error("could not add chain {chain}: {source}")]
    NetworkAdd { chain: String, source: ProviderError },
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Provider(ProviderError),
}

impl ConnectError {
    /// Classify a provider failure outside the network-switch path.
    pub fn from_provider(err: ProviderError) -> Self {
        if err.is_code(codes::USER_REJECTED) {
            ConnectError::Rejected(err)
        } else {
            ConnectError::Provider(err)
        }
    }
}

impl From<ProviderError> for ConnectError {
    fn from(err: ProviderError) -> Self {
        ConnectError::from_provider(err)
    }
}

/// Short explanation suitable for an alert box.
pub fn friendly_message(err: &ConnectError) -> String {
    match err {
        ConnectError::Provider(inner) => match inner.code {
            Some(codes::REQUEST_PENDING) => "a request is already pending in the wallet".to_owned(),
            Some(codes::UNAUTHORIZED) => "the wallet has not authorized this site".to_owned(),
            Some(codes::USER_REJECTED) => "request rejected by user".to_owned(),
            _ if inner.message.trim().is_empty() => "unknown wallet error".to_owned(),
            _ => inner.message.clone(),
        },
        other => other.to_string(),
    }
}
