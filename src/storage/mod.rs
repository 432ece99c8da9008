//! String-keyed durable storage for the cart.
//!
//! The cart is stored as one JSON array under a fixed key. [`load_cart`] and
//! [`persist_cart`] own that format; stores only move strings around.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::Cart;
use crate::error::{CartError, StorageError};

/// Key the storefront has always used for the cart.
pub const DEFAULT_CART_KEY: &str = "@RocketShoes:cart";

#[async_trait]
pub trait PersistentStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: PersistentStore + ?Sized> PersistentStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }
}

/// What to do when the persisted cart cannot be parsed at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptStatePolicy {
    /// Refuse to start.
    #[default]
    Fail,
    /// Start with an empty cart. The bad entry is overwritten by the next mutation.
    Reset,
}

/// Read the cart stored under `key`. A missing entry is an empty cart.
///
/// # Errors
///
/// Returns `CartError::Storage` if the store fails, or `CartError::CorruptState`
/// if the entry does not parse and `policy` is [`CorruptStatePolicy::Fail`].
pub async fn load_cart(
    store: &dyn PersistentStore,
    key: &str,
    policy: CorruptStatePolicy,
) -> Result<Cart, CartError> {
    let Some(raw) = store.get(key).await? else {
        debug!(key, "No persisted cart, starting empty");
        return Ok(Cart::new());
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(cart) => {
            debug!(key, items = cart.len(), "Persisted cart loaded");
            Ok(cart)
        }
        Err(e) => match policy {
            CorruptStatePolicy::Fail => Err(CartError::CorruptState(e.to_string())),
            CorruptStatePolicy::Reset => {
                warn!(key, error = %e, "Persisted cart unreadable, starting empty");
                Ok(Cart::new())
            }
        },
    }
}

/// Write `cart` under `key`.
///
/// # Errors
///
/// Returns `CartError::Serialization` or `CartError::Storage`.
pub async fn persist_cart(store: &dyn PersistentStore, key: &str, cart: &Cart) -> Result<(), CartError> {
    let raw = serde_json::to_string(cart).map_err(|e| CartError::Serialization(e.to_string()))?;
    store.set(key, &raw).await?;
    Ok(())
}
