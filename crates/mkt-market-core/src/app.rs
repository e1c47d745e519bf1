//! Page orchestrator: connection adapter and listing write flow.
//!
//! `MarketApp` owns the wallet provider, the current `Session`, and the
//! `MarketView` the UI renders. Every state change goes through one
//! `publish` helper that commits under a short borrow and then hands the
//! caller-supplied observer a fresh snapshot, so the frontend repaints
//! without this crate knowing about the DOM.

use std::cell::RefCell;
use std::rc::Rc;

use mkt_api_types::AccountId;
use mkt_chain_client::{AccountsWatch, WalletProvider};
use tracing::{debug, info, warn};

use crate::amount::{self, PRICE_DECIMALS};
use crate::catalog;
use crate::error::MarketError;
use crate::session::Session;
use crate::store::{MarketView, Status};

/// Repaint callback, invoked after every committed state change.
pub type Observer = Box<dyn Fn(&MarketView)>;

pub struct MarketApp<P> {
    provider: P,
    view: RefCell<MarketView>,
    session: RefCell<Option<Session>>,
    watch: RefCell<Option<AccountsWatch>>,
    observer: Observer,
}

impl<P: WalletProvider> MarketApp<P> {
    pub fn new(provider: P, observer: Observer) -> Rc<Self> {
        Rc::new(Self {
            provider,
            view: RefCell::new(MarketView::default()),
            session: RefCell::new(None),
            watch: RefCell::new(None),
            observer,
        })
    }

    pub fn snapshot(&self) -> MarketView {
        self.view.borrow().clone()
    }

    /// Mutate the view, then notify the observer with a snapshot. The
    /// borrow never spans an await and never overlaps the observer call.
    fn publish<R>(&self, mutate: impl FnOnce(&mut MarketView) -> R) -> R {
        let out = mutate(&mut self.view.borrow_mut());
        let snapshot = self.view.borrow().clone();
        (self.observer)(&snapshot);
        out
    }

    fn fail(&self, epoch: u64, err: &MarketError) {
        self.publish(|view| {
            if view.epoch == epoch {
                view.status = Some(Status::error(err.to_string()));
            }
        });
    }

    /// Connect to the wallet and build the first session.
    ///
    /// `on_change` receives raw account-change events from the provider;
    /// the caller decides how to re-enter the async context (the browser
    /// frontend forwards into [`switch_account`] via `spawn_local`). The
    /// subscription is registered before the initial account request, as
    /// the wallet convention goes; if an event races the request, the
    /// session created last wins because epochs are bumped synchronously.
    ///
    /// [`switch_account`]: MarketApp::switch_account
    pub async fn connect(
        &self,
        on_change: Box<dyn Fn(Vec<AccountId>)>,
    ) -> Result<(), MarketError> {
        if !self.provider.is_available() {
            let err = MarketError::NoWallet;
            self.publish(|view| view.status = Some(Status::error(err.to_string())));
            return Err(err);
        }

        let watch = self
            .provider
            .watch_accounts(on_change)
            .map_err(MarketError::RemoteRead)?;
        *self.watch.borrow_mut() = Some(watch);

        let accounts = self
            .provider
            .request_accounts()
            .await
            .map_err(MarketError::RemoteRead)?;
        let Some(account) = accounts.into_iter().next() else {
            let err = MarketError::NoAccounts;
            self.publish(|view| view.status = Some(Status::error(err.to_string())));
            return Err(err);
        };
        self.start_session(account).await
    }

    /// Entry point for account-change events. An empty list means the
    /// wallet disconnected every account.
    pub async fn switch_account(&self, accounts: Vec<AccountId>) -> Result<(), MarketError> {
        let Some(account) = accounts.into_iter().next() else {
            info!("wallet disconnected all accounts");
            *self.session.borrow_mut() = None;
            self.publish(|view| {
                view.supersede(None);
                view.status = Some(Status::error(MarketError::NoAccounts.to_string()));
            });
            return Err(MarketError::NoAccounts);
        };
        self.start_session(account).await
    }

    async fn start_session(&self, account: AccountId) -> Result<(), MarketError> {
        // Bump the epoch before the first await so anything still in
        // flight against the old session is already superseded.
        let epoch = self.publish(|view| view.supersede(Some(account.clone())));
        info!(account = %account, epoch, "starting session");

        let contract = match self.provider.bind_contract(&account).await {
            Ok(contract) => contract,
            Err(err) => {
                let err = MarketError::RemoteRead(err);
                self.fail(epoch, &err);
                return Err(err);
            }
        };
        if self.view.borrow().epoch != epoch {
            debug!(epoch, "session superseded while binding contract");
            return Ok(());
        }

        let session = Session {
            account,
            contract,
            epoch,
        };
        *self.session.borrow_mut() = Some(session.clone());
        self.refresh_session(&session).await
    }

    /// Re-run both enumerations for the current session, e.g. from the
    /// page's refresh control. No session yet is a no-op.
    pub async fn refresh(&self) -> Result<(), MarketError> {
        let session = self.session.borrow().clone();
        match session {
            Some(session) => self.refresh_session(&session).await,
            None => Ok(()),
        }
    }

    async fn refresh_session(&self, session: &Session) -> Result<(), MarketError> {
        let fetched = async {
            let catalog = catalog::fetch_catalog(session.contract.as_ref()).await?;
            let owned =
                catalog::fetch_owned(session.contract.as_ref(), &session.account).await?;
            Ok((catalog, owned))
        }
        .await;

        match fetched {
            Ok((catalog, owned)) => {
                self.publish(|view| {
                    if view.commit_catalog(session.epoch, catalog) {
                        view.commit_owned(session.epoch, owned);
                    } else {
                        debug!(epoch = session.epoch, "dropped stale enumeration result");
                    }
                });
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "enumeration failed, keeping last good snapshot");
                self.fail(session.epoch, &err);
                Err(err)
            }
        }
    }

    /// Drive one listing through submit, confirmation, and resync.
    ///
    /// Validation happens before any remote call. The busy flag covers the
    /// whole span and only clears once the post-confirmation resync has
    /// committed (or been dropped as stale). Re-entry while busy is a
    /// no-op; the UI disables the control, this is the backstop.
    pub async fn submit_listing(&self, name: &str, price_text: &str) -> Result<(), MarketError> {
        if self.view.borrow().busy {
            warn!("listing already in flight, ignoring re-entry");
            return Ok(());
        }
        let session = self.session.borrow().clone();
        let Some(session) = session else {
            return Err(MarketError::NoWallet);
        };

        let name = name.trim();
        if name.is_empty() {
            let err = MarketError::EmptyName;
            self.fail(session.epoch, &err);
            return Err(err);
        }
        let price = match amount::parse_units(price_text, PRICE_DECIMALS) {
            Ok(price) => price,
            Err(err) => {
                let err = MarketError::InvalidPrice(err);
                self.fail(session.epoch, &err);
                return Err(err);
            }
        };

        self.publish(|view| {
            view.busy = true;
            view.status = Some(Status::info("Submitting listing…"));
        });

        let outcome = async {
            let tx = session
                .contract
                .list_item(name, price)
                .await
                .map_err(MarketError::TxFailed)?;
            info!(hash = %tx.hash(), "listing submitted, awaiting confirmation");
            tx.confirmed().await.map_err(MarketError::TxFailed)
        }
        .await;

        match outcome {
            Ok(()) => {
                info!("listing confirmed, resynchronizing catalog");
                self.publish(|view| {
                    if view.epoch == session.epoch {
                        view.status = Some(Status::info("Item listed."));
                    }
                });
                let resync = self.refresh_session(&session).await;
                self.publish(|view| {
                    if view.epoch == session.epoch {
                        view.busy = false;
                    }
                });
                resync
            }
            Err(err) => {
                warn!(error = %err, "listing failed");
                self.publish(|view| {
                    if view.epoch == session.epoch {
                        view.busy = false;
                        view.status = Some(Status::error(err.to_string()));
                    }
                });
                Err(err)
            }
        }
    }
}
