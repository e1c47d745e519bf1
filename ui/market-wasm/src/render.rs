//! List rendering.
//!
//! Paints a `MarketView` snapshot: account line, status message, busy
//! gating of the form, and the two item lists. Called by the observer the
//! core invokes after every committed state change.

use mkt_api_types::Item;
use mkt_market_core::amount::{self, PRICE_DECIMALS};
use mkt_market_core::{MarketView, StatusKind};
use web_sys::Element;

use crate::dom::{self, Elements};

pub fn render(els: &Elements, view: &MarketView) {
    match &view.account {
        Some(account) => dom::set_text(
            &els.account_line,
            &format!("Account: {}", shorten(&account.0, 8, 6)),
        ),
        None => dom::set_text(&els.account_line, "Account: not connected"),
    }

    match &view.status {
        Some(status) => {
            dom::set_text(&els.status_line, &status.text);
            match status.kind {
                StatusKind::Error => dom::add_class(&els.status_line, "error"),
                StatusKind::Info => dom::remove_class(&els.status_line, "error"),
            }
        }
        None => {
            dom::set_text(&els.status_line, "");
            dom::remove_class(&els.status_line, "error");
        }
    }

    // One in-flight listing at a time; the core backstops this too.
    els.list_btn.set_disabled(view.busy || view.account.is_none());
    els.list_btn
        .set_text_content(Some(if view.busy { "Processing…" } else { "List Item" }));
    els.refresh_btn.set_disabled(view.busy || view.account.is_none());

    render_items(&els.catalog_list, &view.catalog, "No items listed yet.");
    render_items(&els.owned_list, &view.owned, "You don't own any items yet.");
}

fn render_items(container: &Element, items: &[Item], empty_message: &str) {
    container.set_inner_html("");

    if items.is_empty() {
        let placeholder = dom::create_element("div");
        let _ = placeholder.set_attribute("class", "item-card item-card--empty");
        dom::set_text(&placeholder, empty_message);
        let _ = container.append_child(&placeholder);
        return;
    }

    for item in items {
        let _ = container.append_child(&item_card(item));
    }
}

/// Build one item card. Field values go in via `textContent`; item names
/// come from the contract and must never be interpolated into markup.
fn item_card(item: &Item) -> Element {
    let card = dom::create_element("div");
    let _ = card.set_attribute("class", "item-card");

    card_row(&card, "Name", &item.name);
    card_row(
        &card,
        "Price",
        &format!("{} ETH", amount::format_units(item.price, PRICE_DECIMALS)),
    );
    card_row(&card, "Owner", &shorten(&item.owner.0, 8, 6));
    card_row(&card, "Id", &item.id.to_string());

    card
}

fn card_row(card: &Element, label: &str, value: &str) {
    let row = dom::create_element("p");
    let tag = dom::create_element("strong");
    dom::set_text(&tag, &format!("{label}: "));
    let text = dom::create_element("span");
    dom::set_text(&text, value);
    let _ = row.append_child(&tag);
    let _ = row.append_child(&text);
    let _ = card.append_child(&row);
}

// ── Helpers ──

fn shorten(s: &str, head: usize, tail: usize) -> String {
    if s.len() <= head + tail + 1 {
        s.to_string()
    } else {
        format!("{}\u{2026}{}", &s[..head], &s[s.len() - tail..])
    }
}
