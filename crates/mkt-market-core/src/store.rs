//! Single-writer state container for the page.
//!
//! Every field the UI renders lives here. Async results carry the session
//! epoch observed when the operation started; a commit whose epoch no
//! longer matches is refused, so work begun under a superseded session can
//! never overwrite state built for the current one.

use mkt_api_types::{AccountId, Item};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Transient message shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// Snapshot of everything the page renders.
#[derive(Debug, Clone, Default)]
pub struct MarketView {
    /// Session counter; bumped on every supersession.
    pub epoch: u64,
    pub account: Option<AccountId>,
    /// Full catalog as of the last successful enumeration, in index order.
    pub catalog: Vec<Item>,
    /// Items held by `account`, in the order the contract reports them.
    pub owned: Vec<Item>,
    /// True for the whole submit + confirm + resync span of a listing.
    pub busy: bool,
    pub status: Option<Status>,
}

impl MarketView {
    /// Replace the session wholesale: bump the epoch and discard all
    /// account-dependent state. Returns the new epoch for tagging the
    /// work started under it.
    pub fn supersede(&mut self, account: Option<AccountId>) -> u64 {
        self.epoch += 1;
        self.account = account;
        self.catalog.clear();
        self.owned.clear();
        self.busy = false;
        self.status = None;
        self.epoch
    }

    /// Apply an enumeration result started under `epoch`. Returns false
    /// (and leaves the catalog untouched) if the session moved on.
    pub fn commit_catalog(&mut self, epoch: u64, items: Vec<Item>) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.catalog = items;
        true
    }

    pub fn commit_owned(&mut self, epoch: u64, items: Vec<Item>) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.owned = items;
        true
    }
}
