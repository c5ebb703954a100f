//! The connect-wallet flow.
//!
//! provider check → accounts → network check (switch, or add on 4902) →
//! address shown → config validated → contract clients → token decimals →
//! session published → UI refresh.

use std::cell::Cell;

use kjc_abi::Abi;
use kjc_api_types::{
    BSC_MAINNET, ContractKind, DEFAULT_TOKEN_DECIMALS, NetworkParams, TokenDecimals,
    WalletAddress, WalletSession,
};
use kjc_chain_client::{ContractClient, ContractSet, WalletProvider, codes};
use tracing::{debug, info, warn};

use crate::config::{ContractConfig, ValidatedConfig};
use crate::error::{ConnectError, friendly_message};
use crate::messages;

/// The on-page connection indicator plus modal alerts.
pub trait StatusView {
    /// Neutral text; clears any success/error styling.
    fn show_progress(&self, message: &str);
    fn show_connected(&self, message: &str);
    fn show_error(&self, message: &str);
    fn alert(&self, message: &str);
}

/// Hooks into the rest of the application once a session exists.
pub trait UiRefresh {
    /// Called with the finished session before `refresh`.
    fn publish(&self, _session: &AppSession) {}
    fn refresh(&self);
}

/// Everything the application needs after a successful connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSession {
    pub wallet: WalletSession,
    pub contracts: ContractSet,
    pub usdt_decimals: TokenDecimals,
    pub kjc_decimals: TokenDecimals,
}

pub struct WalletConnector<V, R> {
    network: NetworkParams,
    config: ContractConfig,
    status: V,
    hooks: R,
    in_flight: Cell<bool>,
}

/// Clears the in-flight flag when the attempt ends, however it ends.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<V, R> WalletConnector<V, R>
where
    V: StatusView,
    R: UiRefresh,
{
    pub fn new(config: ContractConfig, status: V, hooks: R) -> Self {
        Self {
            network: BSC_MAINNET,
            config,
            status,
            hooks,
            in_flight: Cell::new(false),
        }
    }

    pub fn status(&self) -> &V {
        &self.status
    }

    pub fn hooks(&self) -> &R {
        &self.hooks
    }

    pub fn is_connecting(&self) -> bool {
        self.in_flight.get()
    }

    /// Run the whole flow. Failures are reported through the `StatusView`
    /// and also returned.
    pub async fn connect<P>(&self, provider: Option<&P>) -> Result<AppSession, ConnectError>
    where
        P: WalletProvider + ?Sized,
    {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("connect requested while another attempt is in flight");
            return Err(ConnectError::AlreadyConnecting);
        };

        match self.establish(provider).await {
            Ok(session) => {
                info!(
                    address = session.wallet.address.as_str(),
                    chain = session.wallet.chain_id.as_str(),
                    "wallet connected"
                );
                self.hooks.publish(&session);
                self.hooks.refresh();
                Ok(session)
            }
            Err(err) => {
                warn!(error = %err, "wallet connection failed");
                self.report(&err);
                Err(err)
            }
        }
    }

    async fn establish<P>(&self, provider: Option<&P>) -> Result<AppSession, ConnectError>
    where
        P: WalletProvider + ?Sized,
    {
        self.status.show_progress(messages::CONNECTING);

        let provider = provider.ok_or(ConnectError::ProviderMissing)?;

        let accounts = provider.request_accounts().await?;
        let mut address = accounts.into_iter().next().ok_or(ConnectError::NoAccounts)?;

        let current = provider.chain_id().await?;
        let expected = self.network.chain_id();
        if current != expected {
            info!(current = current.as_str(), expected = expected.as_str(), "wrong network");
            self.ensure_network(provider).await?;
            // The wallet may expose a different account on the new network.
            if let Some(reread) = provider.accounts().await?.into_iter().next() {
                address = reread;
            }
        }

        self.status
            .show_connected(&format!("{} {}", messages::CONNECTED_MARK, address.short()));

        let config = self.config.validate()?;
        let contracts = build_contracts(&config);
        debug!(count = contracts.iter().count(), "contract clients ready");

        let usdt_decimals = fetch_decimals(provider, &contracts.usdt).await;
        let kjc_decimals = fetch_decimals(provider, &contracts.kjc).await;

        Ok(AppSession {
            wallet: WalletSession {
                address,
                chain_id: expected,
                connected: true,
            },
            contracts,
            usdt_decimals,
            kjc_decimals,
        })
    }

    async fn ensure_network<P>(&self, provider: &P) -> Result<(), ConnectError>
    where
        P: WalletProvider + ?Sized,
    {
        let chain = self.network.chain_id;
        match provider.switch_chain(&self.network.switch_parameter()).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_code(codes::UNRECOGNIZED_CHAIN) => {
                info!(chain, "network unknown to wallet; adding it");
                provider
                    .add_chain(&self.network.add_parameter())
                    .await
                    .map_err(|source| ConnectError::NetworkAdd {
                        chain: chain.to_owned(),
                        source,
                    })
            }
            Err(source) => Err(ConnectError::NetworkSwitch {
                chain: chain.to_owned(),
                source,
            }),
        }
    }

    fn report(&self, err: &ConnectError) {
        match err {
            ConnectError::AlreadyConnecting => {}
            ConnectError::ProviderMissing => {
                self.status.alert(messages::INSTALL_WALLET);
                self.status.show_error(messages::NO_WALLET);
            }
            ConnectError::NetworkSwitch { .. } => {
                self.status.alert(&messages::switch_manually(self.network.chain_name));
                self.status.show_error(messages::CONNECTION_FAILED);
            }
            ConnectError::NetworkAdd { .. } => {
                self.status.alert(&messages::add_manually(self.network.chain_name));
                self.status.show_error(messages::CONNECTION_FAILED);
            }
            ConnectError::Config(_) => {
                self.status.alert(messages::CONFIG_INCOMPLETE);
                self.status.show_error(messages::CONFIG_FAILED);
            }
            other => {
                self.status
                    .alert(&messages::connection_failed(&friendly_message(other)));
                self.status.show_error(messages::CONNECTION_FAILED);
            }
        }
    }
}

pub fn build_contracts(config: &ValidatedConfig) -> ContractSet {
    ContractSet {
        staking: ContractClient::new(
            ContractKind::Staking,
            config.staking_address.clone(),
            config.staking_abi.clone(),
        ),
        router: ContractClient::new(
            ContractKind::Router,
            config.router_address.clone(),
            Abi::router_minimal(),
        ),
        usdt: ContractClient::new(
            ContractKind::Usdt,
            config.usdt_address.clone(),
            config.usdt_abi.clone(),
        ),
        kjc: ContractClient::new(
            ContractKind::Kjc,
            config.kjc_address.clone(),
            Abi::erc20_minimal(),
        ),
    }
}

/// Read `decimals()`; on any failure fall back to 18 and mark the value as such.
pub async fn fetch_decimals<P>(provider: &P, token: &ContractClient) -> TokenDecimals
where
    P: WalletProvider + ?Sized,
{
    match token.decimals(provider).await {
        Ok(value) => TokenDecimals::fetched(value),
        Err(err) => {
            warn!(
                token = token.kind().as_str(),
                address = token.address().as_str(),
                error = %err,
                "decimals() failed; assuming {DEFAULT_TOKEN_DECIMALS}"
            );
            TokenDecimals::fallback(DEFAULT_TOKEN_DECIMALS)
        }
    }
}

impl AppSession {
    pub fn address(&self) -> &WalletAddress {
        &self.wallet.address
    }
}
