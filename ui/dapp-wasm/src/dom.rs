//! DOM element bindings.
//!
//! The connector only touches the `#walletAddress` status element and the
//! optional `#connectWalletBtn`. Both are resolved once at startup.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

pub const STATUS_ID: &str = "walletAddress";
pub const CONNECT_BUTTON_ID: &str = "connectWalletBtn";

// ── Helpers ──

pub fn document() -> Document {
    gloo_utils::document()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_classes(el: &Element, classes: &[&str]) {
    for cls in classes {
        let _ = el.class_list().remove_1(cls);
    }
}

pub fn alert(message: &str) {
    let _ = window().alert_with_message(message);
}

// ── Elements struct ──

#[derive(Clone)]
pub struct Elements {
    pub wallet_address: Element,
    pub connect_btn: Option<HtmlElement>,
}

impl Elements {
    /// Resolve DOM references. Call once after the document has loaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            wallet_address: by_id(STATUS_ID)
                .ok_or_else(|| JsValue::from_str(&format!("missing element #{STATUS_ID}")))?,
            connect_btn: by_id_typed::<HtmlElement>(CONNECT_BUTTON_ID),
        })
    }
}
