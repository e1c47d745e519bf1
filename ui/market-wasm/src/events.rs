//! Event binding.
//!
//! Wires the UI event listeners. To add new events, add a handler fn and
//! attach it with `on_click_async!`.

use mkt_market_core::MarketApp;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dom::{self, Elements};
use crate::ethereum::BrowserProvider;

/// Helper: attach async click handler to an HtmlElement.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $app:expr, $handler:expr) => {{
        let els = $els.clone();
        let app = $app.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            let app2 = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2, &app2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements, app: &Rc<MarketApp<BrowserProvider>>) {
    // ── List item ──
    on_click_async!(els.list_btn, els, app, on_list_item);

    // ── Refresh ──
    on_click_async!(els.refresh_btn, els, app, on_refresh);
}

async fn on_list_item(els: &Elements, app: &Rc<MarketApp<BrowserProvider>>) {
    let name = dom::get_input_value(&els.name_input);
    let price = dom::get_input_value(&els.price_input);
    if app.submit_listing(&name, &price).await.is_ok() {
        els.name_input.set_value("");
        els.price_input.set_value("");
    }
}

async fn on_refresh(_els: &Elements, app: &Rc<MarketApp<BrowserProvider>>) {
    let _ = app.refresh().await;
}
