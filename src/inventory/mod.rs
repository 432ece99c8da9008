//! Read-only access to the remote inventory: stock levels and product metadata.
//!
//! The cart only ever talks to the [`InventoryClient`] trait. Two adapters ship
//! with the crate:
//!
//! - [`HttpInventory`] - the storefront's REST API (`/stock/{id}`, `/products/{id}`)
//! - [`InventoryService`] / [`InventoryHandle`] - an in-process inventory actor
//!   for local runs and tests

pub mod http;
pub mod local;

pub use http::HttpInventory;
pub use local::{InventoryHandle, InventoryService};

use async_trait::async_trait;

use crate::domain::{Product, ProductId};
use crate::error::InventoryError;

#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Current stock level for a product.
    async fn get_stock(&self, product_id: ProductId) -> Result<u32, InventoryError>;

    /// Full catalog record for a product.
    async fn get_product(&self, product_id: ProductId) -> Result<Product, InventoryError>;
}

#[async_trait]
impl<T: InventoryClient + ?Sized> InventoryClient for std::sync::Arc<T> {
    async fn get_stock(&self, product_id: ProductId) -> Result<u32, InventoryError> {
        (**self).get_stock(product_id).await
    }

    async fn get_product(&self, product_id: ProductId) -> Result<Product, InventoryError> {
        (**self).get_product(product_id).await
    }
}
