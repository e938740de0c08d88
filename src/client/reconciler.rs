//! Display projection of the server-side cart.
//!
//! The server owns the cart. The reconciler keeps a copy for rendering plus a derived item
//! count for navigation badges, and bumps that count optimistically while an add is in flight.
//!
//! Every reconciling read takes a ticket from a monotonic sequence. A response is applied only
//! if its ticket is newer than the last one applied to the same part of the projection (cart
//! snapshot or count), so a slow response can never overwrite a fresher one.

use tokio::sync::Mutex;

use crate::{
    client::{error::StoreError, remote::RemoteStore, session::Session},
    models::{Cart, OrderReceipt},
};

/// What happens to an optimistic count bump when the add it anticipated fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptimisticPolicy {
    /// Leave the bump in place until the next cart or count load replaces it.
    #[default]
    KeepOnFailure,
    /// Withdraw the bump as soon as the failure is known.
    RollbackOnFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartStatus {
    Unloaded,
    Loading,
    Loaded,
    Empty,
    Error,
    /// Session torn down; no further operations.
    Closed,
}

#[derive(Debug)]
struct Projection {
    status: CartStatus,
    /// Last good snapshot. Survives `Loading` and `Error`.
    cart: Option<Cart>,
    last_error: Option<StoreError>,
    confirmed_count: u64,
    /// Quantity of adds sent but not yet answered.
    in_flight: u64,
    /// Quantity of failed adds left in the badge under `KeepOnFailure`.
    drift: u64,
    loads_in_flight: usize,
    /// Bumped every time a server count is applied.
    count_applies: u64,
    next_ticket: u64,
    cart_ticket: u64,
    count_ticket: u64,
}

impl Projection {
    fn new() -> Self {
        Self {
            status: CartStatus::Unloaded,
            cart: None,
            last_error: None,
            confirmed_count: 0,
            in_flight: 0,
            drift: 0,
            loads_in_flight: 0,
            count_applies: 0,
            next_ticket: 0,
            cart_ticket: 0,
            count_ticket: 0,
        }
    }

    fn ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.status == CartStatus::Closed {
            return Err(StoreError::Unauthorized("Session closed".into()));
        }
        Ok(())
    }

    fn count(&self) -> u64 {
        self.confirmed_count + self.in_flight + self.drift
    }

    fn apply_cart(&mut self, ticket: u64, cart: &Cart) -> bool {
        if ticket <= self.cart_ticket {
            return false;
        }
        self.cart_ticket = ticket;
        self.status = if cart.is_empty() {
            CartStatus::Empty
        } else {
            CartStatus::Loaded
        };
        self.cart = Some(cart.clone());
        self.last_error = None;
        true
    }

    fn apply_count(&mut self, ticket: u64, count: u64) -> bool {
        if ticket <= self.count_ticket {
            return false;
        }
        self.count_ticket = ticket;
        self.count_applies += 1;
        self.confirmed_count = count;
        self.drift = 0;
        true
    }

    /// Leave `Loading` once the last outstanding load has answered without applying.
    fn settle(&mut self) {
        if self.status != CartStatus::Loading || self.loads_in_flight > 0 {
            return;
        }
        self.status = match &self.cart {
            Some(cart) if cart.is_empty() => CartStatus::Empty,
            Some(_) => CartStatus::Loaded,
            None => CartStatus::Unloaded,
        };
    }
}

pub struct CartReconciler<S> {
    store: S,
    policy: OptimisticPolicy,
    projection: Mutex<Projection>,
}

impl<S: RemoteStore> CartReconciler<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, OptimisticPolicy::default())
    }

    pub fn with_policy(store: S, policy: OptimisticPolicy) -> Self {
        Self {
            store,
            policy,
            projection: Mutex::new(Projection::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> OptimisticPolicy {
        self.policy
    }

    /// Replace the projection with the server's cart.
    ///
    /// A missing cart is a valid empty cart (id 0, no lines). Any other failure leaves the
    /// last good snapshot in place, moves to `Error` and is returned to the caller.
    pub async fn load_cart(&self, session: &Session) -> Result<Cart, StoreError> {
        let ticket = {
            let mut p = self.projection.lock().await;
            p.ensure_open()?;
            p.status = CartStatus::Loading;
            p.loads_in_flight += 1;
            p.ticket()
        };

        let result = match self.store.get_cart(session).await {
            Err(err) if err.is_expected_empty() => {
                tracing::debug!(ticket, "no cart on server, treating as empty");
                Ok(Cart::empty(0))
            }
            other => other,
        };

        let mut p = self.projection.lock().await;
        p.loads_in_flight = p.loads_in_flight.saturating_sub(1);
        if p.status == CartStatus::Closed {
            return Err(StoreError::Unauthorized("Session closed".into()));
        }

        match result {
            Ok(cart) => {
                let applied = p.apply_cart(ticket, &cart);
                p.apply_count(ticket, cart.item_count());
                if applied {
                    return Ok(cart);
                }
                tracing::debug!(ticket, applied = p.cart_ticket, "discarding stale cart response");
                p.settle();
                Ok(p.cart.clone().unwrap_or(cart))
            }
            Err(err) => {
                if ticket > p.cart_ticket {
                    tracing::warn!(ticket, error = %err, "cart load failed");
                    p.status = CartStatus::Error;
                    p.last_error = Some(err.clone());
                } else {
                    p.settle();
                }
                Err(err)
            }
        }
    }

    /// Refresh only the badge count. Any failure, "not found" included, resets it to 0.
    pub async fn load_cart_count(&self, session: &Session) -> u64 {
        let ticket = {
            let mut p = self.projection.lock().await;
            if p.ensure_open().is_err() {
                return 0;
            }
            p.ticket()
        };

        let count = match self.store.get_cart(session).await {
            Ok(cart) => cart.item_count(),
            Err(err) => {
                if !err.is_expected_empty() {
                    tracing::warn!(ticket, error = %err, "cart count load failed, showing 0");
                }
                0
            }
        };

        let mut p = self.projection.lock().await;
        if p.status == CartStatus::Closed {
            return 0;
        }
        if !p.apply_count(ticket, count) {
            tracing::debug!(ticket, applied = p.count_ticket, "discarding stale cart count");
        }
        p.count()
    }

    /// Add `quantity` of an item, bumping the count before the server answers.
    ///
    /// On success the bump is taken as correct, unless a server count was applied while the
    /// add was in flight: that count may already include the add, so the count is re-read
    /// instead. On failure the policy decides whether the bump stays until the next load or
    /// is withdrawn now.
    pub async fn add_to_cart(
        &self,
        session: &Session,
        item_id: i32,
        quantity: i32,
    ) -> Result<u64, StoreError> {
        let delta = u64::try_from(quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| StoreError::Validation("quantity must be greater than 0".into()))?;

        let applies_before = {
            let mut p = self.projection.lock().await;
            p.ensure_open()?;
            p.in_flight += delta;
            p.count_applies
        };

        let result = self.store.add_to_cart(session, item_id, quantity).await;

        let mut p = self.projection.lock().await;
        p.in_flight = p.in_flight.saturating_sub(delta);
        if p.status == CartStatus::Closed {
            return Err(StoreError::Unauthorized("Session closed".into()));
        }
        match result {
            Ok(()) if p.count_applies == applies_before => {
                p.confirmed_count += delta;
                Ok(p.count())
            }
            Ok(()) => {
                drop(p);
                tracing::debug!(item_id, quantity, "cart read during add, re-reading count");
                Ok(self.load_cart_count(session).await)
            }
            Err(err) => {
                match self.policy {
                    OptimisticPolicy::KeepOnFailure => p.drift += delta,
                    OptimisticPolicy::RollbackOnFailure => {}
                }
                tracing::warn!(item_id, quantity, policy = ?self.policy, error = %err, "add to cart failed");
                Err(err)
            }
        }
    }

    /// Remove an item's line, then re-read the whole cart whether or not the removal worked.
    ///
    /// Nothing is removed locally ahead of the server. A removal error takes precedence over
    /// the outcome of the re-read.
    pub async fn remove_from_cart(&self, session: &Session, item_id: i32) -> Result<Cart, StoreError> {
        self.projection.lock().await.ensure_open()?;

        let removed = self.store.remove_from_cart(session, item_id).await;
        if let Err(err) = &removed {
            tracing::warn!(item_id, error = %err, "remove from cart failed");
        }
        let reloaded = self.load_cart(session).await;

        removed?;
        reloaded
    }

    /// Place an order for the server-side cart and clear the local projection.
    ///
    /// Loads that started before the order was confirmed can no longer bring back the
    /// purchased lines.
    pub async fn checkout(&self, session: &Session) -> Result<OrderReceipt, StoreError> {
        self.projection.lock().await.ensure_open()?;

        let receipt = self.store.create_order(session).await.map_err(|err| {
            tracing::warn!(error = %err, "checkout failed");
            err
        })?;

        let mut p = self.projection.lock().await;
        if p.status == CartStatus::Closed {
            return Ok(receipt);
        }
        let ticket = p.ticket();
        let emptied = match &p.cart {
            Some(cart) => Cart {
                id: cart.id,
                user_id: cart.user_id,
                items: Vec::new(),
            },
            None => Cart::empty(0),
        };
        p.apply_cart(ticket, &emptied);
        p.apply_count(ticket, 0);
        tracing::info!(order_id = receipt.order_id, total = receipt.total, "checkout complete");
        Ok(receipt)
    }

    /// End of session: drop the projection and refuse further operations.
    pub async fn teardown(&self) {
        let mut p = self.projection.lock().await;
        *p = Projection::new();
        p.status = CartStatus::Closed;
    }

    pub async fn cart(&self) -> Option<Cart> {
        self.projection.lock().await.cart.clone()
    }

    /// Displayed total of the current snapshot, always recomputed from its lines.
    pub async fn cart_total(&self) -> Option<i64> {
        self.projection.lock().await.cart.as_ref().map(Cart::total)
    }

    pub async fn cart_count(&self) -> u64 {
        self.projection.lock().await.count()
    }

    pub async fn status(&self) -> CartStatus {
        self.projection.lock().await.status
    }

    pub async fn last_error(&self) -> Option<StoreError> {
        self.projection.lock().await.last_error.clone()
    }
}
