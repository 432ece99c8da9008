//! # cart-store
//!
//! Shopping-cart state for a storefront client: add products, remove them and
//! change quantities, with stock checks against the inventory and every change
//! mirrored to durable key-value storage.
//!
//! ## Pieces
//!
//! - **Domain types** - [`Product`], [`CartLineItem`], [`Cart`]
//! - **Collaborators** - [`InventoryClient`], [`PersistentStore`], [`NotificationSink`]
//! - **Cart service** - [`CartService`] owns the cart and serializes all
//!   mutations; [`CartClient`] is the handle callers hold
//! - **System** - [`CartSystem`] loads the persisted cart, starts the service
//!   and shuts it down; [`CartConfig`] and [`setup_tracing`] cover the rest
//!
//! ## Example
//!
//! ```rust,ignore
//! let config = CartConfig::from_env()?;
//! let system = CartSystem::start(&config, Collaborators::new(inventory, store, TracingNotifier)).await?;
//!
//! let cart = system.client();
//! cart.add_product(1).await?;
//! cart.update_product_amount(1, 3).await?;
//! cart.remove_product(1).await?;
//!
//! system.shutdown().await?;
//! ```
//!
//! Failed operations have already been reported to the shopper through the
//! notification sink when their error is returned.

#[macro_use]
mod macros;

pub mod app_system;
pub mod cart_actor;
pub mod domain;
pub mod error;
pub mod inventory;
pub mod messages;
pub mod notify;
pub mod storage;

#[cfg(test)]
mod mock_framework;

pub use app_system::{setup_tracing, CartConfig, CartSystem};
pub use cart_actor::{CartClient, CartOperation, CartService, Collaborators};
pub use domain::{Cart, CartLineItem, Product, ProductId};
pub use error::{CartError, ConfigError, ErrorKind, InvalidCart, InventoryError, StorageError};
pub use inventory::InventoryClient;
pub use notify::NotificationSink;
pub use storage::{CorruptStatePolicy, PersistentStore};
