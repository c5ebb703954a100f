//! Browser implementations of the connector's UI seams.

use js_sys::{Function, Reflect};
use kjc_connector::{AppSession, StatusView, UiRefresh};
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Element};

use crate::dom;
use crate::state::{self, SessionSummary};

pub const CONNECTED_EVENT: &str = "kjc:connected";
const REFRESH_HOOK: &str = "updateUI";

/// `#walletAddress` text plus `success` / `error` classes, and `window.alert`.
#[derive(Clone)]
pub struct DomStatus {
    el: Element,
}

impl DomStatus {
    pub fn new(el: Element) -> Self {
        Self { el }
    }
}

impl StatusView for DomStatus {
    fn show_progress(&self, message: &str) {
        dom::set_text(&self.el, message);
        dom::remove_classes(&self.el, &["success", "error"]);
    }

    fn show_connected(&self, message: &str) {
        dom::set_text(&self.el, message);
        dom::add_class(&self.el, "success");
    }

    fn show_error(&self, message: &str) {
        dom::set_text(&self.el, message);
        dom::add_class(&self.el, "error");
    }

    fn alert(&self, message: &str) {
        dom::alert(message);
    }
}

/// Stores the session, then calls the page's `updateUI()` and fires `kjc:connected`.
#[derive(Clone, Default)]
pub struct SessionHooks;

impl UiRefresh for SessionHooks {
    fn publish(&self, session: &AppSession) {
        state::set_session(session.clone());
    }

    fn refresh(&self) {
        let window = dom::window();

        match Reflect::get(&window, &JsValue::from_str(REFRESH_HOOK))
            .ok()
            .and_then(|v| v.dyn_into::<Function>().ok())
        {
            Some(hook) => {
                if let Err(err) = hook.call0(&window) {
                    tracing::warn!(error = ?err, "updateUI() threw");
                }
            }
            None => debug!("no global updateUI(); relying on {CONNECTED_EVENT}"),
        }

        let detail = state::session()
            .map(|s| SessionSummary::from(&s))
            .and_then(|summary| serde_wasm_bindgen::to_value(&summary).ok())
            .unwrap_or(JsValue::NULL);
        let init = CustomEventInit::new();
        init.set_detail(&detail);
        if let Ok(event) = CustomEvent::new_with_event_init_dict(CONNECTED_EVENT, &init) {
            let _ = window.dispatch_event(&event);
        }
    }
}
