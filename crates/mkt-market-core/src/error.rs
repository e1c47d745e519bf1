use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount must be a plain decimal number")]
    NotNumeric,
    #[error("amount has more than {0} fractional digits")]
    TooPrecise(u32),
    #[error("amount is too large")]
    Overflow,
}

/// Everything that can go wrong in the client. None of these are fatal to
/// the page: every path returns the UI to idle with the last good state,
/// and the `Display` text is what the user sees.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("no browser wallet detected; install one to use this page")]
    NoWallet,
    #[error("the wallet returned no accounts")]
    NoAccounts,
    #[error("could not read the marketplace contract")]
    RemoteRead(#[source] anyhow::Error),
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] AmountError),
    #[error("item name cannot be empty")]
    EmptyName,
    #[error("listing was rejected or failed")]
    TxFailed(#[source] anyhow::Error),
}
