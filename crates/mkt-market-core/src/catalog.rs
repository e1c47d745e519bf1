//! Catalog enumeration over the index-addressed contract store.
//!
//! The contract exposes a scalar count and 1-based, gap-free item indices.
//! Both enumerations are all-or-nothing: any failed read fails the whole
//! call so the caller keeps its previous snapshot instead of rendering a
//! partial one.

use futures::future::try_join_all;
use mkt_api_types::{AccountId, Item, ItemId};
use mkt_chain_client::MarketContract;
use tracing::debug;

use crate::error::MarketError;

/// Fetch the full catalog: read the count, then every index 1..=N.
///
/// Reads are dispatched concurrently; `try_join_all` reassembles them in
/// index order regardless of completion order, which is the order the page
/// displays. A count of zero issues no item reads.
pub async fn fetch_catalog(contract: &dyn MarketContract) -> Result<Vec<Item>, MarketError> {
    let count = contract.item_count().await.map_err(MarketError::RemoteRead)?;
    debug!(count, "enumerating catalog");
    let reads = (1..=count).map(|id| contract.item(ItemId(id)));
    try_join_all(reads).await.map_err(MarketError::RemoteRead)
}

/// Fetch the items held by `owner`, preserving the exact order of the
/// contract's ownership index. No holdings is an empty vector, not an
/// error.
pub async fn fetch_owned(
    contract: &dyn MarketContract,
    owner: &AccountId,
) -> Result<Vec<Item>, MarketError> {
    let ids = contract
        .items_by_owner(owner)
        .await
        .map_err(MarketError::RemoteRead)?;
    debug!(owner = %owner, holdings = ids.len(), "enumerating owned items");
    let reads = ids.into_iter().map(|id| contract.item(id));
    try_join_all(reads).await.map_err(MarketError::RemoteRead)
}
