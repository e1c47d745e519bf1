//! Marketplace client core.
//!
//! Host-independent logic for the single-page marketplace client: wallet
//! session lifecycle, catalog enumeration, the listing write flow, and the
//! state container the UI renders from. All remote calls go through the
//! `mkt-chain-client` traits, so everything here runs against in-memory
//! doubles in tests.

pub mod amount;
pub mod app;
pub mod catalog;
pub mod error;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use app::MarketApp;
pub use error::{AmountError, MarketError};
pub use store::{MarketView, Status, StatusKind};
