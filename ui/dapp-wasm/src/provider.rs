//! `window.ethereum` as a `WalletProvider`.
//!
//! Calls go through `js_sys::Reflect` so the binding works with any
//! EIP-1193 object (MetaMask, Bitget Wallet, in-app wallet browsers).

use async_trait::async_trait;
use js_sys::{Function, Object, Promise, Reflect};
use kjc_chain_client::{ProviderError, WalletProvider};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::dom;

#[derive(Clone)]
pub struct Eip1193Provider {
    ethereum: Object,
}

impl Eip1193Provider {
    /// The injected provider, if the page has one.
    pub fn detect() -> Option<Self> {
        let value = Reflect::get(&dom::window(), &JsValue::from_str("ethereum")).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        value
            .dyn_into::<Object>()
            .ok()
            .map(|ethereum| Self { ethereum })
    }

    /// Register `provider.on(event, handler)`. The closure lives for the page's lifetime.
    pub fn on(&self, event: &str, handler: impl FnMut(JsValue) + 'static) -> Result<(), JsValue> {
        let on: Function = Reflect::get(&self.ethereum, &JsValue::from_str("on"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("provider has no on()"))?;
        let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(JsValue)>);
        on.call2(&self.ethereum, &JsValue::from_str(event), cb.as_ref())?;
        cb.forget();
        Ok(())
    }
}

#[async_trait(?Send)]
impl WalletProvider for Eip1193Provider {
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, ProviderError> {
        debug!(method, "provider request");

        let args = Object::new();
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(provider_error)?;
        if let Some(params) = params {
            let js_params = params
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .map_err(|err| ProviderError::other(err.to_string()))?;
            Reflect::set(&args, &JsValue::from_str("params"), &js_params)
                .map_err(provider_error)?;
        }

        let request: Function = Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .map_err(provider_error)?
            .dyn_into()
            .map_err(|_| ProviderError::other("provider has no request()"))?;
        let returned = request.call1(&self.ethereum, &args).map_err(provider_error)?;

        let result = JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(provider_error)?;
        serde_wasm_bindgen::from_value(result).map_err(|err| ProviderError::other(err.to_string()))
    }
}

/// Convert a rejection (`{ code, message }` per EIP-1193, or anything else) into a `ProviderError`.
fn provider_error(value: JsValue) -> ProviderError {
    let code = Reflect::get(&value, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64())
        .map(|c| c as i64);
    let message = Reflect::get(&value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    ProviderError { code, message }
}
