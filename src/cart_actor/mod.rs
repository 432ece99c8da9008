//! The cart store as an actor.
//!
//! [`CartService`] owns the cart and processes one request at a time, remote
//! inventory calls included, so concurrent mutations of the same product can
//! never overwrite each other. [`CartClient`] is the cloneable handle UI code
//! holds.

pub mod client;
pub mod service;

pub use client::CartClient;
pub use service::CartService;

use std::sync::Arc;

use crate::error::{CartError, ErrorKind};
use crate::inventory::InventoryClient;
use crate::notify::NotificationSink;
use crate::storage::PersistentStore;

pub const OUT_OF_STOCK_NOTICE: &str = "Requested quantity out of stock";

/// The three cart mutations, used to pick the message shown on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

impl CartOperation {
    pub fn failure_notice(self) -> &'static str {
        match self {
            CartOperation::AddProduct => "Error adding product",
            CartOperation::RemoveProduct => "Error removing product",
            CartOperation::UpdateProductAmount => "Error changing product quantity",
        }
    }

    /// Message shown to the shopper when this operation fails with `error`.
    pub fn notice_for(self, error: &CartError) -> &'static str {
        match error.kind() {
            ErrorKind::OutOfStock => OUT_OF_STOCK_NOTICE,
            _ => self.failure_notice(),
        }
    }
}

/// External services the cart depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub inventory: Arc<dyn InventoryClient>,
    pub store: Arc<dyn PersistentStore>,
    pub notifier: Arc<dyn NotificationSink>,
}

impl Collaborators {
    pub fn new(
        inventory: impl InventoryClient + 'static,
        store: impl PersistentStore + 'static,
        notifier: impl NotificationSink + 'static,
    ) -> Self {
        Self {
            inventory: Arc::new(inventory),
            store: Arc::new(store),
            notifier: Arc::new(notifier),
        }
    }
}
