//! The shopping cart store.
//!
//! [`CartStore`] is the single source of truth for the cart. It is a cheaply
//! cloneable handle: the purchase page, the cart page and the navbar badge
//! each hold a clone of the same store, read it through [`CartStore::snapshot`]
//! or a [`Subscription`], and change it only through the mutation methods.
//!
//! # Mutation protocol
//!
//! Every mutation:
//! 1. commits under the store's lock and bumps the snapshot version,
//! 2. releases the lock,
//! 3. hands the new snapshot to each listener, in registration order,
//! 4. fires its user notification, if it has one.
//!
//! Listeners therefore never see a half-applied change, and may call back
//! into the store.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use shieldsync_core::{CartStore, NewCartItem, NullNotifier, Price, ProductId};
//!
//! let store = CartStore::new(NullNotifier);
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&seen);
//! let subscription = store.subscribe(move |snapshot| {
//!     sink.lock().unwrap().push(snapshot.total());
//! });
//!
//! store.add_item(NewCartItem::new("pro-av", "Pro", Price::whole(9)));
//! store.update_quantity(&ProductId::from("pro-av"), 5).unwrap();
//!
//! assert_eq!(*seen.lock().unwrap(), vec![Price::whole(9), Price::whole(45)]);
//! subscription.unsubscribe();
//! ```

mod error;
mod line;
mod snapshot;
mod subscription;

pub use error::CartError;
pub use line::{CartLine, NewCartItem};
pub use snapshot::CartSnapshot;
pub use subscription::Subscription;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::notify::{CartEvent, Notifier};
use crate::types::{Price, ProductId};
use subscription::ListenerRegistry;

/// Observable, in-memory shopping cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    state: Mutex<CartState>,
    listeners: Arc<ListenerRegistry>,
    notifier: Box<dyn Notifier>,
}

#[derive(Default)]
struct CartState {
    version: u64,
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Create an empty cart that reports to `notifier`.
    #[must_use]
    pub fn new(notifier: impl Notifier + 'static) -> Self {
        Self {
            inner: Arc::new(CartStoreInner {
                state: Mutex::new(CartState::default()),
                listeners: Arc::new(ListenerRegistry::default()),
                notifier: Box::new(notifier),
            }),
        }
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart gets its quantity bumped by one and
    /// keeps the name and price from its first add. Otherwise a new line is
    /// appended with a quantity of one.
    pub fn add_item(&self, item: NewCartItem) {
        let id = item.id.clone();
        let (event, snapshot) = self.commit(|lines| {
            if let Some(line) = lines.iter_mut().find(|line| line.id() == &item.id) {
                line.increment();
                CartEvent::QuantityIncremented { name: item.name }
            } else {
                let name = item.name.clone();
                lines.push(CartLine::first(item));
                CartEvent::ItemAdded { name }
            }
        });

        debug!(
            product_id = %id,
            quantity = snapshot.line(&id).map_or(0, CartLine::quantity),
            version = snapshot.version(),
            "cart item added"
        );
        self.announce(&event);
    }

    /// Remove a product from the cart.
    ///
    /// Removing a product that is not in the cart changes nothing, but the
    /// "removed" notification is still sent.
    pub fn remove_item(&self, id: &ProductId) {
        let (removed, snapshot) = self.commit(|lines| remove_line(lines, id));

        debug!(
            product_id = %id,
            removed,
            version = snapshot.version(),
            "cart item removed"
        );
        self.announce(&CartEvent::ItemRemoved);
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// A quantity of zero removes the line without a notification. Unknown
    /// products are ignored; no line is created. An accepted call always
    /// commits, even when nothing changed: the version is bumped and
    /// listeners get the (identical) lines again.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` is negative or
    /// larger than `u32::MAX`. The cart is left untouched.
    pub fn update_quantity(&self, id: &ProductId, quantity: i64) -> Result<(), CartError> {
        let Ok(new_quantity) = u32::try_from(quantity) else {
            warn!(product_id = %id, quantity, "rejected cart quantity");
            return Err(CartError::InvalidQuantity { quantity });
        };

        let (changed, snapshot) = self.commit(|lines| {
            if new_quantity == 0 {
                return remove_line(lines, id);
            }
            match lines.iter_mut().find(|line| line.id() == id) {
                Some(line) => {
                    line.set_quantity(new_quantity);
                    true
                }
                None => false,
            }
        });

        debug!(
            product_id = %id,
            quantity = new_quantity,
            changed,
            version = snapshot.version(),
            "cart quantity updated"
        );
        Ok(())
    }

    /// Empty the cart.
    pub fn clear_cart(&self) {
        let (cleared, snapshot) = self.commit(|lines| {
            let count = lines.len();
            lines.clear();
            count
        });

        debug!(lines = cleared, version = snapshot.version(), "cart cleared");
        self.announce(&CartEvent::Cleared);
    }

    /// Current lines and version.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        let state = self.state();
        CartSnapshot::new(state.version, state.lines.clone())
    }

    /// Sum of `unit_price × quantity`, computed from the current lines.
    #[must_use]
    pub fn total(&self) -> Price {
        snapshot::total_of(&self.state().lines)
    }

    /// Current line for a product, if it is in the cart.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<CartLine> {
        self.state()
            .lines
            .iter()
            .find(|line| line.id() == id)
            .cloned()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state().lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state().lines.is_empty()
    }

    /// Call `listener` with a fresh snapshot after every committed mutation.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        let id = self.inner.listeners.insert(Arc::new(listener));
        Subscription::new(id, &self.inner.listeners)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Apply `mutate` atomically, then notify listeners outside the lock.
    fn commit<R>(&self, mutate: impl FnOnce(&mut Vec<CartLine>) -> R) -> (R, CartSnapshot) {
        let (outcome, snapshot) = {
            let mut state = self.state();
            let outcome = mutate(&mut state.lines);
            state.version += 1;
            (
                outcome,
                CartSnapshot::new(state.version, state.lines.clone()),
            )
        };

        self.inner.listeners.dispatch(&snapshot);
        (outcome, snapshot)
    }

    fn announce(&self, event: &CartEvent) {
        let notification = event.notification();
        if let Err(e) = self.inner.notifier.notify(&notification) {
            warn!(
                error = %e,
                message = %notification.message,
                "Failed to display cart notification"
            );
        }
    }

    fn state(&self) -> MutexGuard<'_, CartState> {
        // Every mutation leaves the lines valid, so a poisoned lock is safe to reuse.
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(crate::notify::TracingNotifier)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("CartStore")
            .field("version", &state.version)
            .field("lines", &state.lines)
            .field("listeners", &self.inner.listeners.len())
            .finish_non_exhaustive()
    }
}

fn remove_line(lines: &mut Vec<CartLine>, id: &ProductId) -> bool {
    let before = lines.len();
    lines.retain(|line| line.id() != id);
    lines.len() != before
}
