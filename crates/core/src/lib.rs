//! SHIELDSYNC Core - Cart state and shared storefront types.
//!
//! This crate holds everything the storefront pages share that is not a
//! call to the hosted backend:
//! - [`cart`] - The observable cart store and its derived total
//! - [`notify`] - Fire-and-forget user notifications for cart mutations
//! - [`catalog`] - The SHIELDSYNC product plans offered on the purchase page
//! - [`types`] - Newtype wrappers for product IDs and prices
//!
//! # Architecture
//!
//! The core crate performs no network I/O. Authentication, storage, realtime
//! feeds and chat completion belong to the hosted service the page
//! controllers talk to; none of that state ever flows through the cart.
//!
//! # Example
//!
//! ```rust
//! use shieldsync_core::{CartStore, Catalog, NullNotifier, ProductId};
//!
//! let catalog = Catalog::shieldsync();
//! let store = CartStore::new(NullNotifier);
//!
//! let basic = catalog.find(&ProductId::from("basic-av")).unwrap();
//! store.add_item(basic.to_cart_item());
//! store.add_item(basic.to_cart_item());
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.len(), 1);
//! assert_eq!(snapshot.total().display_inr(), "₹28");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod notify;
pub mod types;

pub use cart::{CartError, CartLine, CartSnapshot, CartStore, NewCartItem, Subscription};
pub use catalog::{Catalog, CatalogError, Product};
pub use notify::{
    CartEvent, Notification, NotifyError, Notifier, NullNotifier, RecordingNotifier, Severity,
    TracingNotifier,
};
pub use types::*;
