use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use kjc_api_types::{BSC_MAINNET, ContractKind, DecimalsSource};
use kjc_chain_client::{ProviderError, WalletProvider};
use serde_json::{Value, json};

use crate::config::tests::sample;
use crate::messages;
use crate::{AppSession, ConnectError, ContractConfig, StatusView, UiRefresh, WalletConnector};

const USER: &str = "0x1234567890abcdef1234567890abcdef1234abcd";
const OTHER_USER: &str = "0x9999999999999999999999999999999999990000";
const USDT: &str = "0x55d398326f99059fF775485246999027B3197955";
const KJC: &str = "0x2000000000000000000000000000000000000002";

#[derive(Clone, Copy)]
enum Switch {
    Succeeds,
    UnknownChain,
    Fails(i64),
}

struct MockWallet {
    chain: RefCell<String>,
    accounts: Vec<&'static str>,
    accounts_after_switch: Vec<&'static str>,
    reject_accounts: bool,
    switch: Switch,
    add_fails: bool,
    decimals: HashMap<String, Result<u8, ProviderError>>,
    yield_on_accounts: bool,
    log: RefCell<Vec<(String, Option<Value>)>>,
}

impl MockWallet {
    fn on_chain(chain: &str) -> Self {
        Self {
            chain: RefCell::new(chain.to_owned()),
            accounts: vec![USER],
            accounts_after_switch: vec![USER],
            reject_accounts: false,
            switch: Switch::Succeeds,
            add_fails: false,
            decimals: HashMap::new(),
            yield_on_accounts: false,
            log: RefCell::new(Vec::new()),
        }
    }

    fn methods(&self) -> Vec<String> {
        self.log.borrow().iter().map(|(m, _)| m.clone()).collect()
    }

    fn count(&self, method: &str) -> usize {
        self.log.borrow().iter().filter(|(m, _)| m == method).count()
    }

    fn params_of(&self, method: &str) -> Option<Value> {
        self.log
            .borrow()
            .iter()
            .find(|(m, _)| m == method)
            .and_then(|(_, p)| p.clone())
    }

    fn switched(&self) -> bool {
        self.count("wallet_switchEthereumChain") > 0
    }
}

#[async_trait(?Send)]
impl WalletProvider for MockWallet {
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, ProviderError> {
        self.log
            .borrow_mut()
            .push((method.to_owned(), params.clone()));

        match method {
            "eth_requestAccounts" => {
                if self.yield_on_accounts {
                    tokio::task::yield_now().await;
                }
                if self.reject_accounts {
                    return Err(ProviderError::new(4001, "User rejected the request."));
                }
                Ok(json!(self.accounts))
            }
            "eth_accounts" => {
                if self.switched() {
                    Ok(json!(self.accounts_after_switch))
                } else {
                    Ok(json!(self.accounts))
                }
            }
            "eth_chainId" => Ok(json!(self.chain.borrow().clone())),
            "wallet_switchEthereumChain" => match self.switch {
                Switch::Succeeds => {
                    *self.chain.borrow_mut() = BSC_MAINNET.chain_id.to_owned();
                    Ok(Value::Null)
                }
                Switch::UnknownChain => Err(ProviderError::new(
                    4902,
                    "Unrecognized chain ID \"0x38\". Try adding the chain using wallet_addEthereumChain first.",
                )),
                Switch::Fails(code) => Err(ProviderError::new(code, "switch failed")),
            },
            "wallet_addEthereumChain" => {
                if self.add_fails {
                    return Err(ProviderError::new(4001, "User rejected the request."));
                }
                *self.chain.borrow_mut() = BSC_MAINNET.chain_id.to_owned();
                Ok(Value::Null)
            }
            "eth_call" => {
                let to = params
                    .as_ref()
                    .and_then(|p| p[0]["to"].as_str())
                    .unwrap_or_default()
                    .to_lowercase();
                match self.decimals.get(&to).cloned().unwrap_or(Ok(18)) {
                    Ok(value) => Ok(json!(format!("0x{value:064x}"))),
                    Err(err) => Err(err),
                }
            }
            other => Err(ProviderError::new(4200, format!("unsupported method {other}"))),
        }
    }
}

#[derive(Default)]
struct RecordingStatus {
    events: RefCell<Vec<(&'static str, String)>>,
}

impl RecordingStatus {
    fn last(&self, kind: &str) -> Option<String> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
    }

    fn kinds(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(|(k, _)| *k).collect()
    }
}

impl StatusView for RecordingStatus {
    fn show_progress(&self, message: &str) {
        self.events.borrow_mut().push(("progress", message.to_owned()));
    }

    fn show_connected(&self, message: &str) {
        self.events.borrow_mut().push(("connected", message.to_owned()));
    }

    fn show_error(&self, message: &str) {
        self.events.borrow_mut().push(("error", message.to_owned()));
    }

    fn alert(&self, message: &str) {
        self.events.borrow_mut().push(("alert", message.to_owned()));
    }
}

#[derive(Default)]
struct RecordingHooks {
    refreshes: Cell<usize>,
    published: RefCell<Option<AppSession>>,
}

impl UiRefresh for RecordingHooks {
    fn publish(&self, session: &AppSession) {
        *self.published.borrow_mut() = Some(session.clone());
    }

    fn refresh(&self) {
        self.refreshes.set(self.refreshes.get() + 1);
    }
}

fn connector(config: ContractConfig) -> WalletConnector<RecordingStatus, RecordingHooks> {
    WalletConnector::new(config, RecordingStatus::default(), RecordingHooks::default())
}

#[tokio::test]
async fn missing_provider_reports_error_without_requests() {
    let connector = connector(sample());

    let result = connector.connect::<MockWallet>(None).await;

    assert_eq!(result, Err(ConnectError::ProviderMissing));
    let status = connector.status();
    assert_eq!(status.kinds(), vec!["progress", "alert", "error"]);
    assert_eq!(status.last("alert").as_deref(), Some(messages::INSTALL_WALLET));
    assert_eq!(status.last("error").as_deref(), Some(messages::NO_WALLET));
    assert_eq!(connector.hooks().refreshes.get(), 0);
}

#[tokio::test]
async fn matching_network_issues_no_switch_or_add() {
    let connector = connector(sample());
    let wallet = MockWallet::on_chain("0x38");

    let session = connector.connect(Some(&wallet)).await.unwrap();

    assert_eq!(
        wallet.methods(),
        vec!["eth_requestAccounts", "eth_chainId", "eth_call", "eth_call"]
    );
    assert_eq!(session.wallet.chain_id.as_str(), "0x38");
    assert!(session.wallet.connected);
    assert_eq!(
        connector.status().last("connected").as_deref(),
        Some("\u{2705} 0x1234...abcd")
    );
}

#[tokio::test]
async fn known_network_mismatch_switches_once_then_rereads_account() {
    let connector = connector(sample());
    let mut wallet = MockWallet::on_chain("0x1");
    wallet.accounts_after_switch = vec![OTHER_USER];

    let session = connector.connect(Some(&wallet)).await.unwrap();

    assert_eq!(wallet.count("wallet_switchEthereumChain"), 1);
    assert_eq!(wallet.count("wallet_addEthereumChain"), 0);
    assert_eq!(
        wallet.params_of("wallet_switchEthereumChain"),
        Some(json!([{ "chainId": "0x38" }]))
    );
    let methods = wallet.methods();
    let switch_at = methods
        .iter()
        .position(|m| m == "wallet_switchEthereumChain")
        .unwrap();
    assert_eq!(methods[switch_at + 1], "eth_accounts");
    assert_eq!(session.address().as_str(), OTHER_USER);
}

#[tokio::test]
async fn unknown_network_is_added_with_bsc_parameters() {
    let connector = connector(sample());
    let mut wallet = MockWallet::on_chain("0x1");
    wallet.switch = Switch::UnknownChain;

    connector.connect(Some(&wallet)).await.unwrap();

    assert_eq!(
        wallet.params_of("wallet_addEthereumChain"),
        Some(json!([{
            "chainId": "0x38",
            "chainName": "BNB Smart Chain",
            "nativeCurrency": { "name": "BNB", "symbol": "BNB", "decimals": 18 },
            "rpcUrls": ["https://bsc-dataseed.binance.org/"],
            "blockExplorerUrls": ["https://bscscan.com/"]
        }]))
    );
    let methods = wallet.methods();
    let add_at = methods
        .iter()
        .position(|m| m == "wallet_addEthereumChain")
        .unwrap();
    assert_eq!(methods[add_at + 1], "eth_accounts");
}

#[tokio::test]
async fn failed_switch_is_terminal() {
    let connector = connector(sample());
    let mut wallet = MockWallet::on_chain("0x1");
    wallet.switch = Switch::Fails(4001);

    let result = connector.connect(Some(&wallet)).await;

    assert!(matches!(result, Err(ConnectError::NetworkSwitch { .. })));
    assert_eq!(wallet.count("wallet_addEthereumChain"), 0);
    assert_eq!(wallet.count("eth_call"), 0);
    assert_eq!(
        connector.status().last("alert"),
        Some(messages::switch_manually("BNB Smart Chain"))
    );
    assert_eq!(
        connector.status().last("error").as_deref(),
        Some(messages::CONNECTION_FAILED)
    );
    assert_eq!(connector.hooks().refreshes.get(), 0);
}

#[tokio::test]
async fn failed_add_is_terminal() {
    let connector = connector(sample());
    let mut wallet = MockWallet::on_chain("0x1");
    wallet.switch = Switch::UnknownChain;
    wallet.add_fails = true;

    let result = connector.connect(Some(&wallet)).await;

    assert!(matches!(result, Err(ConnectError::NetworkAdd { .. })));
    assert_eq!(wallet.count("eth_accounts"), 0);
    assert_eq!(
        connector.status().last("alert"),
        Some(messages::add_manually("BNB Smart Chain"))
    );
}

#[tokio::test]
async fn incomplete_config_never_builds_contracts() {
    let mut config = sample();
    config.usdt_abi = None;
    let connector = connector(config);
    let wallet = MockWallet::on_chain("0x38");

    let result = connector.connect(Some(&wallet)).await;

    assert!(matches!(result, Err(ConnectError::Config(_))));
    assert_eq!(wallet.count("eth_call"), 0);
    assert!(connector.hooks().published.borrow().is_none());
    assert_eq!(connector.hooks().refreshes.get(), 0);
    let status = connector.status();
    assert_eq!(status.kinds(), vec!["progress", "connected", "alert", "error"]);
    assert_eq!(status.last("error").as_deref(), Some(messages::CONFIG_FAILED));
}

#[tokio::test]
async fn full_flow_builds_four_clients_and_refreshes_once() {
    let connector = connector(sample());
    let mut wallet = MockWallet::on_chain("0x38");
    wallet.decimals.insert(USDT.to_lowercase(), Ok(6));

    let session = connector.connect(Some(&wallet)).await.unwrap();

    let kinds: Vec<ContractKind> = session.contracts.iter().map(|c| c.kind()).collect();
    assert_eq!(kinds, ContractKind::ALL.to_vec());
    assert!(session.contracts.router.abi().has_function("getAmountsOut"));
    assert!(session.contracts.kjc.abi().has_function("allowance"));
    assert!(session.contracts.staking.abi().has_function("stake"));
    assert_eq!(session.usdt_decimals.value, 6);
    assert_eq!(session.usdt_decimals.source, DecimalsSource::Fetched);
    assert_eq!(session.kjc_decimals.value, 18);

    assert_eq!(connector.hooks().refreshes.get(), 1);
    assert_eq!(connector.hooks().published.borrow().as_ref(), Some(&session));
    assert!(!connector.is_connecting());
}

#[tokio::test]
async fn failing_decimals_fall_back_to_eighteen() {
    let connector = connector(sample());
    let mut wallet = MockWallet::on_chain("0x38");
    wallet.decimals.insert(
        KJC.to_lowercase(),
        Err(ProviderError::new(-32000, "execution reverted")),
    );

    let session = connector.connect(Some(&wallet)).await.unwrap();

    assert_eq!(session.kjc_decimals.value, 18);
    assert!(session.kjc_decimals.is_fallback());
    assert!(!session.usdt_decimals.is_fallback());
    assert_eq!(connector.hooks().refreshes.get(), 1);
}

#[tokio::test]
async fn rejected_account_request_is_reported() {
    let connector = connector(sample());
    let mut wallet = MockWallet::on_chain("0x38");
    wallet.reject_accounts = true;

    let result = connector.connect(Some(&wallet)).await;

    assert!(matches!(result, Err(ConnectError::Rejected(_))));
    assert_eq!(wallet.methods(), vec!["eth_requestAccounts"]);
    assert_eq!(
        connector.status().last("alert"),
        Some(messages::connection_failed("request rejected by user"))
    );
}

#[tokio::test]
async fn empty_account_list_is_an_error() {
    let connector = connector(sample());
    let mut wallet = MockWallet::on_chain("0x38");
    wallet.accounts = Vec::new();

    let result = connector.connect(Some(&wallet)).await;

    assert_eq!(result, Err(ConnectError::NoAccounts));
    assert_eq!(wallet.count("eth_chainId"), 0);
}

#[tokio::test]
async fn concurrent_connect_is_rejected() {
    let connector = connector(sample());
    let mut wallet = MockWallet::on_chain("0x38");
    wallet.yield_on_accounts = true;

    let (first, second) = tokio::join!(
        connector.connect(Some(&wallet)),
        connector.connect(Some(&wallet))
    );

    assert!(first.is_ok());
    assert_eq!(second, Err(ConnectError::AlreadyConnecting));
    assert_eq!(wallet.count("eth_requestAccounts"), 1);
    assert_eq!(connector.hooks().refreshes.get(), 1);
    assert_eq!(connector.status().kinds(), vec!["progress", "connected"]);
    assert!(!connector.is_connecting());
}

#[tokio::test]
async fn guard_is_released_after_failure() {
    let connector = connector(sample());
    let mut wallet = MockWallet::on_chain("0x38");
    wallet.reject_accounts = true;

    assert!(connector.connect(Some(&wallet)).await.is_err());
    assert!(!connector.is_connecting());

    wallet.reject_accounts = false;
    assert!(connector.connect(Some(&wallet)).await.is_ok());
}
