use anyhow::Result;
use async_trait::async_trait;
use mkt_api_types::{AccountId, Item, ItemId};
use std::rc::Rc;

/// A transaction accepted by the wallet but not yet mined.
#[async_trait(?Send)]
pub trait PendingTx {
    fn hash(&self) -> String;
    /// Resolves once the transaction is confirmed, or fails if it is
    /// dropped or reverted.
    async fn confirmed(self: Box<Self>) -> Result<()>;
}

/// The deployed marketplace contract, bound to a signing account.
/// Item ids are 1-based and contiguous up to `item_count()`.
#[async_trait(?Send)]
pub trait MarketContract {
    async fn item_count(&self) -> Result<u64>;
    async fn item(&self, id: ItemId) -> Result<Item>;
    async fn items_by_owner(&self, owner: &AccountId) -> Result<Vec<ItemId>>;
    async fn list_item(&self, name: &str, price: u128) -> Result<Box<dyn PendingTx>>;
}

/// The injected browser wallet. Traits are `?Send`: the host environment
/// is a single-threaded page, and handles never cross threads.
#[async_trait(?Send)]
pub trait WalletProvider {
    fn is_available(&self) -> bool;
    async fn request_accounts(&self) -> Result<Vec<AccountId>>;
    async fn bind_contract(&self, account: &AccountId) -> Result<Rc<dyn MarketContract>>;
    fn watch_accounts(&self, on_change: Box<dyn Fn(Vec<AccountId>)>) -> Result<AccountsWatch>;
}

/// Guard for an account-change subscription. Dropping it unsubscribes.
pub struct AccountsWatch {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl AccountsWatch {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for AccountsWatch {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
