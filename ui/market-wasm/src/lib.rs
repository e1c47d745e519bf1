//! Marketstall browser frontend.
//!
//! Pure Rust + WASM single-page client for the marketplace contract.
//! All decision logic lives in `mkt-market-core`; this crate binds the
//! injected wallet provider, wires DOM events, and repaints from core
//! state snapshots.

pub mod dom;
pub mod ethereum;
pub mod events;
pub mod render;

use mkt_market_core::MarketApp;
use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();
    // Route core `tracing` events to the console.
    tracing_wasm::set_as_global_default();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    let provider = ethereum::BrowserProvider::probe();
    let paint_els = els.clone();
    let app = MarketApp::new(provider, Box::new(move |view| render::render(&paint_els, view)));

    events::bind_events(&els, &app);
    render::render(&els, &app.snapshot());

    // Account-change events hop back onto the async context here; the
    // core's epoch rule arbitrates against anything still in flight.
    let forward = app.clone();
    let connected = app
        .connect(Box::new(move |accounts| {
            let app = forward.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let _ = app.switch_account(accounts).await;
            });
        }))
        .await;

    if let Err(err) = connected {
        // Already on the page via the status line; keep the detail in the
        // console only.
        gloo_console::warn!(format!("connect failed: {err}"));
    }

    Ok(())
}
