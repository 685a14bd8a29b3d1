//! Cart state holder.
//!
//! [`CartStore`] wraps every call to the Storefront API with the same steps:
//! mark the state as loading and clear the previous error, run the call, then
//! either replace the cart with exactly what Shopify returned or record the
//! error message. Loading is cleared by a drop guard so it cannot stay set
//! whatever path the call takes.
//!
//! Observers follow the state through a [`tokio::sync::watch`] channel.
//! Mutations hold a [`MutationPermit`] for their cart; overlapping mutations
//! on the same cart are refused with [`CartError::Busy`].

mod gate;
pub mod storage;

pub use gate::{MutationGate, MutationPermit};
pub use storage::{
    CART_ID_SLOT, CartIdStore, DisabledCartIdStore, FileCartIdStore, SessionCartIdStore,
    StorageError,
};

use std::future::Future;

use async_trait::async_trait;
use marquee_core::{CartId, CartLineId, VariantId};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::shopify::{
    Cart, CartLineInput, CartLineUpdateInput, ShopifyError, StorefrontClient,
};

/// Errors surfaced by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Shopify rejected the request or could not be reached.
    #[error(transparent)]
    Remote(#[from] ShopifyError),

    /// The operation needs a cart and there is none.
    #[error("No cart found")]
    NoCart,

    /// Another mutation on the same cart is still running.
    #[error("Another cart update is already in progress")]
    Busy,
}

// =============================================================================
// CartApi
// =============================================================================

/// Remote cart operations.
///
/// Every method issues exactly one request and returns the cart exactly as
/// Shopify sent it back.
#[async_trait]
pub trait CartApi: Send + Sync {
    async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, ShopifyError>;

    async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, ShopifyError>;

    async fn add_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError>;

    async fn update_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError>;

    async fn remove_lines(
        &self,
        cart_id: &CartId,
        line_ids: Vec<CartLineId>,
    ) -> Result<Cart, ShopifyError>;

    async fn add_line(
        &self,
        cart_id: &CartId,
        variant_id: VariantId,
        quantity: i64,
    ) -> Result<Cart, ShopifyError> {
        self.add_lines(cart_id, vec![CartLineInput::new(variant_id, quantity)])
            .await
    }

    async fn update_line(
        &self,
        cart_id: &CartId,
        line_id: CartLineId,
        quantity: i64,
    ) -> Result<Cart, ShopifyError> {
        self.update_lines(
            cart_id,
            vec![CartLineUpdateInput {
                id: line_id,
                quantity,
            }],
        )
        .await
    }

    async fn remove_line(&self, cart_id: &CartId, line_id: CartLineId) -> Result<Cart, ShopifyError> {
        self.remove_lines(cart_id, vec![line_id]).await
    }
}

#[async_trait]
impl CartApi for StorefrontClient {
    async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, ShopifyError> {
        Self::create_cart(self, lines).await
    }

    async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, ShopifyError> {
        Self::get_cart(self, cart_id).await
    }

    async fn add_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        Self::add_lines(self, cart_id, lines).await
    }

    async fn update_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        Self::update_lines(self, cart_id, lines).await
    }

    async fn remove_lines(
        &self,
        cart_id: &CartId,
        line_ids: Vec<CartLineId>,
    ) -> Result<Cart, ShopifyError> {
        Self::remove_lines(self, cart_id, line_ids).await
    }
}

// =============================================================================
// CartState
// =============================================================================

/// Snapshot of the state holder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartState {
    /// Last cart returned by Shopify, if any.
    pub cart: Option<Cart>,
    /// Whether a request is in flight.
    pub loading: bool,
    /// Message of the last failed operation, cleared when the next one starts.
    pub error: Option<String>,
}

/// Clears `loading` when dropped.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<CartState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.loading = false);
    }
}

// =============================================================================
// CartStore
// =============================================================================

/// Process-local cart state mirrored from Shopify.
pub struct CartStore<A, S> {
    api: A,
    storage: S,
    gate: MutationGate,
    scope: String,
    state: watch::Sender<CartState>,
}

impl<A: CartApi, S: CartIdStore> CartStore<A, S> {
    /// Create an empty state holder.
    ///
    /// `scope` names the owner (a session, a state directory) and keys the
    /// mutation gate while no cart exists yet.
    pub fn new(api: A, storage: S, gate: MutationGate, scope: impl Into<String>) -> Self {
        let (state, _) = watch::channel(CartState::default());
        Self {
            api,
            storage,
            gate,
            scope: scope.into(),
            state,
        }
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Follow every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn cart(&self) -> Option<Cart> {
        self.state.borrow().cart.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Checkout URL of the current cart.
    #[must_use]
    pub fn checkout_url(&self) -> Option<String> {
        self.state
            .borrow()
            .cart
            .as_ref()
            .map(|cart| cart.checkout_url.clone())
    }

    fn cart_id(&self) -> Option<CartId> {
        self.state.borrow().cart.as_ref().map(|cart| cart.id.clone())
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Load the remembered cart.
    ///
    /// A remembered ID Shopify reports as not found is forgotten: the slot is
    /// cleared, no cart is set and no error is recorded. Any other failure
    /// keeps the remembered ID so a later call can retry it.
    ///
    /// # Errors
    ///
    /// Returns the lookup error when Shopify could not answer, mirrored into
    /// the state.
    #[instrument(skip(self), fields(scope = %self.scope))]
    pub async fn initialize(&self) -> Result<Option<Cart>, CartError> {
        let stored = match self.storage.stored_id().await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to read stored cart ID");
                None
            }
        };

        let Some(cart_id) = stored else {
            return Ok(None);
        };

        match self.get_cart(&cart_id).await {
            Ok(cart) => Ok(Some(cart)),
            Err(e @ CartError::Remote(ShopifyError::NotFound(_))) => {
                debug!(cart_id = %cart_id, error = %e, "Stored cart no longer resolves, forgetting it");
                if let Err(e) = self.storage.clear().await {
                    warn!(error = %e, "Failed to clear stored cart ID");
                }
                self.state.send_modify(|s| {
                    s.cart = None;
                    s.error = None;
                });
                Ok(None)
            }
            Err(e) => {
                warn!(cart_id = %cart_id, error = %e, "Failed to load stored cart, keeping its ID");
                Err(e)
            }
        }
    }

    /// Create a cart with `lines` and remember its ID.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Busy`] if another mutation is running, or the
    /// remote error.
    pub async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, CartError> {
        let _permit = self.acquire()?;
        self.create_cart_locked(lines).await
    }

    /// Fetch a cart and make it the current one.
    ///
    /// # Errors
    ///
    /// Returns the remote error, [`ShopifyError::NotFound`] included.
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, CartError> {
        self.track(async {
            let cart = self.api.get_cart(cart_id).await?;
            self.replace(&cart);
            Ok(cart)
        })
        .await
    }

    /// Add a variant to the cart, creating the cart when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Busy`] if another mutation is running, or the
    /// remote error.
    pub async fn add_line(&self, variant_id: VariantId, quantity: i64) -> Result<Cart, CartError> {
        let _permit = self.acquire()?;

        let Some(cart_id) = self.cart_id() else {
            return self
                .create_cart_locked(vec![CartLineInput::new(variant_id, quantity)])
                .await;
        };

        self.track(async {
            let cart = self.api.add_line(&cart_id, variant_id, quantity).await?;
            self.replace(&cart);
            Ok(cart)
        })
        .await
    }

    /// Set the quantity of a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoCart`] without a cart, [`CartError::Busy`] if
    /// another mutation is running, or the remote error.
    pub async fn update_line(&self, line_id: CartLineId, quantity: i64) -> Result<Cart, CartError> {
        let _permit = self.acquire()?;

        self.track(async {
            let cart_id = self.cart_id().ok_or(CartError::NoCart)?;
            let cart = self.api.update_line(&cart_id, line_id, quantity).await?;
            self.replace(&cart);
            Ok(cart)
        })
        .await
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoCart`] without a cart, [`CartError::Busy`] if
    /// another mutation is running, or the remote error.
    pub async fn remove_line(&self, line_id: CartLineId) -> Result<Cart, CartError> {
        let _permit = self.acquire()?;

        self.track(async {
            let cart_id = self.cart_id().ok_or(CartError::NoCart)?;
            let cart = self.api.remove_line(&cart_id, line_id).await?;
            self.replace(&cart);
            Ok(cart)
        })
        .await
    }

    /// Remove every line in one request.
    ///
    /// Without a cart this does nothing; a cart with no lines is returned as
    /// is without a request.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Busy`] if another mutation is running, or the
    /// remote error.
    pub async fn clear_cart(&self) -> Result<Option<Cart>, CartError> {
        let _permit = self.acquire()?;

        let Some(current) = self.cart() else {
            return Ok(None);
        };
        if current.is_empty() {
            return Ok(Some(current));
        }

        self.track(async {
            let cart = self
                .api
                .remove_lines(&current.id, current.line_ids())
                .await?;
            self.replace(&cart);
            Ok(Some(cart))
        })
        .await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn acquire(&self) -> Result<MutationPermit, CartError> {
        let key = self
            .cart_id()
            .map_or_else(|| self.scope.clone(), CartId::into_inner);
        let permit = self.gate.try_acquire(key)?;
        debug!(key = permit.key(), "Cart mutation permit taken");
        Ok(permit)
    }

    async fn create_cart_locked(&self, lines: Vec<CartLineInput>) -> Result<Cart, CartError> {
        self.track(async {
            let cart = self.api.create_cart(lines).await?;
            self.replace(&cart);
            if let Err(e) = self.storage.store_id(&cart.id).await {
                warn!(cart_id = %cart.id, error = %e, "Failed to remember cart ID");
            }
            Ok(cart)
        })
        .await
    }

    /// Run `op` with loading set, mirroring its error into the state.
    async fn track<T, F>(&self, op: F) -> Result<T, CartError>
    where
        F: Future<Output = Result<T, CartError>>,
    {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        let _loading = LoadingGuard { state: &self.state };

        let result = op.await;
        if let Err(e) = &result {
            let message = e.to_string();
            self.state.send_modify(|s| s.error = Some(message));
        }
        result
    }

    fn replace(&self, cart: &Cart) {
        let cart = cart.clone();
        self.state.send_modify(|s| s.cart = Some(cart));
    }
}
