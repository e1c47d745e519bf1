use mkt_api_types::AccountId;
use mkt_chain_client::MarketContract;
use std::rc::Rc;

/// The (account, contract handle) pair currently in effect. Replaced
/// wholesale on account change, never patched; `epoch` tags async work
/// started under this session so a stale result can be dropped on commit.
#[derive(Clone)]
pub struct Session {
    pub account: AccountId,
    pub contract: Rc<dyn MarketContract>,
    pub epoch: u64,
}
