//! Scripted in-memory doubles for the wallet and contract boundaries.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use mkt_api_types::{AccountId, Item, ItemId};
use mkt_chain_client::{AccountsWatch, MarketContract, PendingTx, WalletProvider};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::Notify;

use crate::store::MarketView;

pub fn account(addr: &str) -> AccountId {
    AccountId(addr.to_string())
}

/// Observer that records every published snapshot.
pub fn recorder() -> (Box<dyn Fn(&MarketView)>, Rc<RefCell<Vec<MarketView>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    (
        Box::new(move |view: &MarketView| sink.borrow_mut().push(view.clone())),
        log,
    )
}

#[derive(Default)]
struct ContractState {
    items: RefCell<Vec<Item>>,
    owners: RefCell<HashMap<AccountId, Vec<u64>>>,
    calls: RefCell<Vec<String>>,
    completions: RefCell<Vec<String>>,
    fail_item: Cell<Option<u64>>,
    fail_submit: Cell<bool>,
    fail_confirm: Cell<bool>,
    reversed_latency: Cell<bool>,
    count_gate: RefCell<Option<Rc<Notify>>>,
    confirm_gate: RefCell<Option<Rc<Notify>>>,
}

/// Contract double backed by a shared in-memory store. Clones share the
/// store, mirroring several handles bound to one deployed contract.
#[derive(Clone)]
pub struct ScriptedContract {
    state: Rc<ContractState>,
    bound: AccountId,
}

impl ScriptedContract {
    pub fn with_items(names: &[&str]) -> Self {
        let contract = Self {
            state: Rc::new(ContractState::default()),
            bound: account("0xseller"),
        };
        {
            let mut items = contract.state.items.borrow_mut();
            for (index, name) in names.iter().enumerate() {
                let id = index as u64 + 1;
                items.push(Item {
                    id: ItemId(id),
                    name: (*name).to_string(),
                    price: id as u128 * 1_000_000_000_000_000_000,
                    owner: account("0xseller"),
                });
            }
        }
        contract
    }

    /// Same store, bound to a different signing account.
    pub fn bound_to(&self, account: &AccountId) -> Self {
        Self {
            state: self.state.clone(),
            bound: account.clone(),
        }
    }

    pub fn owned_by(self, owner: &AccountId, ids: &[u64]) -> Self {
        self.state
            .owners
            .borrow_mut()
            .insert(owner.clone(), ids.to_vec());
        {
            let mut items = self.state.items.borrow_mut();
            for item in items.iter_mut() {
                if ids.contains(&item.id.0) {
                    item.owner = owner.clone();
                }
            }
        }
        self
    }

    pub fn failing_item(self, id: u64) -> Self {
        self.state.fail_item.set(Some(id));
        self
    }

    pub fn failing_submit(self) -> Self {
        self.state.fail_submit.set(true);
        self
    }

    pub fn failing_confirm(self) -> Self {
        self.state.fail_confirm.set(true);
        self
    }

    /// Make earlier indices resolve later than later ones.
    pub fn reversed_latency(self) -> Self {
        self.state.reversed_latency.set(true);
        self
    }

    /// Park `item_count` calls until the returned handle is notified.
    pub fn hold_counts(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        *self.state.count_gate.borrow_mut() = Some(gate.clone());
        gate
    }

    /// Park `PendingTx::confirmed` until the returned handle is notified.
    pub fn hold_confirms(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        *self.state.confirm_gate.borrow_mut() = Some(gate.clone());
        gate
    }

    pub fn fail_reads_from_now_on(&self) {
        self.state.fail_item.set(Some(1));
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.calls.borrow().clone()
    }

    pub fn completions(&self) -> Vec<String> {
        self.state.completions.borrow().clone()
    }

    pub fn reset_calls(&self) {
        self.state.calls.borrow_mut().clear();
        self.state.completions.borrow_mut().clear();
    }

    fn record(&self, call: String) {
        self.state.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl MarketContract for ScriptedContract {
    async fn item_count(&self) -> Result<u64> {
        self.record("item_count".to_string());
        let gate = self.state.count_gate.borrow().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(self.state.items.borrow().len() as u64)
    }

    async fn item(&self, id: ItemId) -> Result<Item> {
        self.record(format!("item({id})"));
        if self.state.reversed_latency.get() {
            let total = self.state.items.borrow().len() as u64;
            tokio::time::sleep(Duration::from_millis(10 * (1 + total - id.0))).await;
        }
        self.state.completions.borrow_mut().push(format!("item({id})"));
        if self.state.fail_item.get() == Some(id.0) {
            return Err(anyhow!("read reverted for item {id}"));
        }
        self.state
            .items
            .borrow()
            .get(id.0 as usize - 1)
            .cloned()
            .ok_or_else(|| anyhow!("no item at index {id}"))
    }

    async fn items_by_owner(&self, owner: &AccountId) -> Result<Vec<ItemId>> {
        self.record(format!("items_by_owner({owner})"));
        Ok(self
            .state
            .owners
            .borrow()
            .get(owner)
            .map(|ids| ids.iter().copied().map(ItemId).collect())
            .unwrap_or_default())
    }

    async fn list_item(&self, name: &str, price: u128) -> Result<Box<dyn PendingTx>> {
        self.record(format!("list_item({name}, {price})"));
        if self.state.fail_submit.get() {
            return Err(anyhow!("user rejected the transaction"));
        }
        Ok(Box::new(ScriptedTx {
            contract: self.clone(),
            name: name.to_string(),
            price,
        }))
    }
}

struct ScriptedTx {
    contract: ScriptedContract,
    name: String,
    price: u128,
}

#[async_trait(?Send)]
impl PendingTx for ScriptedTx {
    fn hash(&self) -> String {
        format!("0xtx-{}", self.name)
    }

    async fn confirmed(self: Box<Self>) -> Result<()> {
        let gate = self.contract.state.confirm_gate.borrow().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.contract.state.fail_confirm.get() {
            return Err(anyhow!("transaction reverted"));
        }
        // Mined: the store gains the item, owned by the bound account.
        let id = {
            let mut items = self.contract.state.items.borrow_mut();
            let id = items.len() as u64 + 1;
            items.push(Item {
                id: ItemId(id),
                name: self.name,
                price: self.price,
                owner: self.contract.bound.clone(),
            });
            id
        };
        self.contract
            .state
            .owners
            .borrow_mut()
            .entry(self.contract.bound.clone())
            .or_default()
            .push(id);
        Ok(())
    }
}

/// Wallet double: a fixed account list plus one contract store per account.
pub struct ScriptedProvider {
    available: bool,
    accounts: Vec<AccountId>,
    contracts: RefCell<HashMap<AccountId, ScriptedContract>>,
    pub watching: Cell<bool>,
}

impl ScriptedProvider {
    pub fn unavailable() -> Self {
        Self {
            available: false,
            accounts: Vec::new(),
            contracts: RefCell::new(HashMap::new()),
            watching: Cell::new(false),
        }
    }

    pub fn without_accounts() -> Self {
        Self {
            available: true,
            ..Self::unavailable()
        }
    }

    pub fn with_account(account: &AccountId, contract: &ScriptedContract) -> Self {
        let provider = Self {
            available: true,
            accounts: vec![account.clone()],
            contracts: RefCell::new(HashMap::new()),
            watching: Cell::new(false),
        };
        provider.add_account(account, contract);
        provider
    }

    /// Register a further account the wallet can switch to.
    pub fn add_account(&self, account: &AccountId, contract: &ScriptedContract) {
        self.contracts
            .borrow_mut()
            .insert(account.clone(), contract.bound_to(account));
    }
}

#[async_trait(?Send)]
impl WalletProvider for ScriptedProvider {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_accounts(&self) -> Result<Vec<AccountId>> {
        Ok(self.accounts.clone())
    }

    async fn bind_contract(&self, account: &AccountId) -> Result<Rc<dyn MarketContract>> {
        let contract = self
            .contracts
            .borrow()
            .get(account)
            .cloned()
            .ok_or_else(|| anyhow!("no contract scripted for {account}"))?;
        Ok(Rc::new(contract))
    }

    fn watch_accounts(&self, _on_change: Box<dyn Fn(Vec<AccountId>)>) -> Result<AccountsWatch> {
        self.watching.set(true);
        Ok(AccountsWatch::new(|| {}))
    }
}
