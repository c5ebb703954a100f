//! Event binding.
//!
//! Async handlers are spawned via `wasm_bindgen_futures::spawn_local`.

use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dom::{self, Elements};
use crate::state;
use crate::wallet;

/// Bind UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    let Some(btn) = &els.connect_btn else {
        warn!("no #{} on the page; connect via connectWallet()", dom::CONNECT_BUTTON_ID);
        return;
    };

    let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(connector) = state::connector() {
                let _ = wallet::connect(&connector).await;
            }
        });
    }) as Box<dyn FnMut(_)>);
    if let Err(err) = btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref()) {
        warn!(error = ?err, "could not bind connect button");
    }
    cb.forget();
}
