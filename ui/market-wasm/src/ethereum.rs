//! Injected wallet provider and contract bridge bindings.
//!
//! Binds the EIP-1193 provider at `window.ethereum` and the ethers-style
//! contract bridge the host page exposes at `window.marketplace` (a thin
//! JS wrapper that normalises BigNumber-ish values into plain strings and
//! numbers). Implements the `mkt-chain-client` traits over those externs,
//! awaiting promises via `JsFuture`.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use js_sys::Reflect;
use mkt_api_types::{AccountId, Item, ItemId};
use mkt_chain_client::{AccountsWatch, MarketContract, PendingTx, WalletProvider};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    /// EIP-1193 provider (`window.ethereum`).
    #[derive(Clone)]
    pub type Eip1193;

    #[wasm_bindgen(method)]
    fn request(this: &Eip1193, args: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(method)]
    fn on(this: &Eip1193, event: &str, callback: &js_sys::Function);

    #[wasm_bindgen(method, js_name = removeListener)]
    fn remove_listener(this: &Eip1193, event: &str, callback: &js_sys::Function);

    /// Contract bridge (`window.marketplace`). `bind(account)` returns a
    /// contract handle wired to that account's signer.
    pub type MarketBridge;

    #[wasm_bindgen(method)]
    fn bind(this: &MarketBridge, account: &str) -> js_sys::Promise;

    pub type BridgeContract;

    #[wasm_bindgen(method, js_name = itemCount)]
    fn item_count(this: &BridgeContract) -> js_sys::Promise;

    #[wasm_bindgen(method)]
    fn item(this: &BridgeContract, id: f64) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = itemsByOwner)]
    fn items_by_owner(this: &BridgeContract, owner: &str) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = listItem)]
    fn list_item(this: &BridgeContract, name: &str, price_wei: &str) -> js_sys::Promise;

    pub type BridgeTx;

    #[wasm_bindgen(method, getter)]
    fn hash(this: &BridgeTx) -> String;

    #[wasm_bindgen(method)]
    fn wait(this: &BridgeTx) -> js_sys::Promise;
}

#[derive(Serialize)]
struct RequestArgs<'a> {
    method: &'a str,
}

/// Item record as the bridge hands it over: plain JSON values, price as a
/// decimal wei string (u128 does not survive a JS number).
#[derive(Deserialize)]
struct RawItem {
    id: u64,
    name: String,
    price: String,
    owner: String,
}

impl TryFrom<RawItem> for Item {
    type Error = anyhow::Error;

    fn try_from(raw: RawItem) -> Result<Item> {
        let price: u128 = raw
            .price
            .parse()
            .map_err(|_| anyhow!("item {} has a non-integer price {:?}", raw.id, raw.price))?;
        Ok(Item {
            id: ItemId(raw.id),
            name: raw.name,
            price,
            owner: AccountId(raw.owner),
        })
    }
}

async fn await_promise(promise: js_sys::Promise, what: &str) -> Result<JsValue> {
    JsFuture::from(promise)
        .await
        .map_err(|err| anyhow!("{what} failed: {err:?}"))
}

fn parse_accounts(value: &JsValue) -> Vec<AccountId> {
    js_sys::Array::from(value)
        .iter()
        .filter_map(|entry| entry.as_string())
        .map(AccountId)
        .collect()
}

/// The injected browser wallet plus the page's contract bridge.
pub struct BrowserProvider {
    ethereum: Option<Eip1193>,
    bridge: Option<MarketBridge>,
}

impl BrowserProvider {
    /// Probe the page globals. Absence is not an error here; `connect`
    /// reports it as the no-wallet case with a static message.
    pub fn probe() -> Self {
        let window = crate::dom::window();
        Self {
            ethereum: global(&window, "ethereum").map(JsValue::unchecked_into),
            bridge: global(&window, "marketplace").map(JsValue::unchecked_into),
        }
    }
}

fn global(window: &web_sys::Window, name: &str) -> Option<JsValue> {
    let value = Reflect::get(window, &JsValue::from_str(name)).ok()?;
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value)
    }
}

#[async_trait(?Send)]
impl WalletProvider for BrowserProvider {
    fn is_available(&self) -> bool {
        self.ethereum.is_some() && self.bridge.is_some()
    }

    async fn request_accounts(&self) -> Result<Vec<AccountId>> {
        let ethereum = self.ethereum.as_ref().ok_or_else(|| anyhow!("no provider"))?;
        let args = serde_wasm_bindgen::to_value(&RequestArgs {
            method: "eth_requestAccounts",
        })
        .map_err(|err| anyhow!("building request args: {err}"))?;
        let accounts = await_promise(ethereum.request(&args), "eth_requestAccounts").await?;
        Ok(parse_accounts(&accounts))
    }

    async fn bind_contract(&self, account: &AccountId) -> Result<Rc<dyn MarketContract>> {
        let bridge = self.bridge.as_ref().ok_or_else(|| anyhow!("no contract bridge"))?;
        let contract = await_promise(bridge.bind(&account.0), "contract bind").await?;
        Ok(Rc::new(ContractHandle {
            contract: contract.unchecked_into(),
        }))
    }

    fn watch_accounts(&self, on_change: Box<dyn Fn(Vec<AccountId>)>) -> Result<AccountsWatch> {
        let ethereum = self.ethereum.clone().ok_or_else(|| anyhow!("no provider"))?;
        let callback = Closure::wrap(Box::new(move |accounts: JsValue| {
            on_change(parse_accounts(&accounts));
        }) as Box<dyn FnMut(JsValue)>);
        ethereum.on("accountsChanged", callback.as_ref().unchecked_ref());

        // The guard keeps the closure alive; dropping it unsubscribes.
        Ok(AccountsWatch::new(move || {
            ethereum.remove_listener("accountsChanged", callback.as_ref().unchecked_ref());
        }))
    }
}

struct ContractHandle {
    contract: BridgeContract,
}

#[async_trait(?Send)]
impl MarketContract for ContractHandle {
    async fn item_count(&self) -> Result<u64> {
        let value = await_promise(self.contract.item_count(), "itemCount").await?;
        js_u64(&value).ok_or_else(|| anyhow!("itemCount returned a non-integer: {value:?}"))
    }

    async fn item(&self, id: ItemId) -> Result<Item> {
        let value = await_promise(self.contract.item(id.0 as f64), "items").await?;
        let raw: RawItem = serde_wasm_bindgen::from_value(value)
            .map_err(|err| anyhow!("malformed item record at index {id}: {err}"))?;
        raw.try_into()
    }

    async fn items_by_owner(&self, owner: &AccountId) -> Result<Vec<ItemId>> {
        let value = await_promise(self.contract.items_by_owner(&owner.0), "itemsByOwner").await?;
        let ids: Vec<u64> = serde_wasm_bindgen::from_value(value)
            .map_err(|err| anyhow!("malformed ownership index: {err}"))?;
        Ok(ids.into_iter().map(ItemId).collect())
    }

    async fn list_item(&self, name: &str, price: u128) -> Result<Box<dyn PendingTx>> {
        let value = await_promise(
            self.contract.list_item(name, &price.to_string()),
            "listItem",
        )
        .await?;
        Ok(Box::new(PendingBridgeTx {
            tx: value.unchecked_into(),
        }))
    }
}

struct PendingBridgeTx {
    tx: BridgeTx,
}

#[async_trait(?Send)]
impl PendingTx for PendingBridgeTx {
    fn hash(&self) -> String {
        self.tx.hash()
    }

    async fn confirmed(self: Box<Self>) -> Result<()> {
        await_promise(self.tx.wait(), "transaction wait").await?;
        Ok(())
    }
}

fn js_u64(value: &JsValue) -> Option<u64> {
    if let Some(number) = value.as_f64() {
        if number.fract() == 0.0 && number >= 0.0 {
            return Some(number as u64);
        }
        return None;
    }
    value.as_string()?.parse().ok()
}
