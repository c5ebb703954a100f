//! Loading the contract configuration shipped next to the page.

use gloo_net::http::Request;
use kjc_connector::ContractConfig;
use tracing::warn;

pub const CONFIG_URL: &str = "config.json";

pub async fn fetch_text(url: &str) -> Result<String, String> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    if !resp.ok() {
        return Err(format!("{} {}", resp.status(), resp.status_text()));
    }
    resp.text().await.map_err(|e| format!("text error: {e}"))
}

/// Fetch and parse `config.json`. A missing or malformed file yields an
/// empty config, which the connector rejects as incomplete on connect.
pub async fn load_config(url: &str) -> ContractConfig {
    config_or_empty(url, fetch_text(url).await)
}

fn config_or_empty(url: &str, fetched: Result<String, String>) -> ContractConfig {
    let text = match fetched {
        Ok(text) => text,
        Err(err) => {
            warn!(url, error = %err, "contract config unavailable");
            return ContractConfig::default();
        }
    };
    ContractConfig::from_json(&text).unwrap_or_else(|err| {
        warn!(url, error = %err, "contract config malformed");
        ContractConfig::default()
    })
}
