use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::InventoryClient;
use crate::domain::{Product, ProductId, Stock};
use crate::error::InventoryError;

/// Inventory client for the storefront REST API.
#[derive(Clone)]
pub struct HttpInventory {
    client: Client,
    base_url: String,
}

impl HttpInventory {
    /// Create a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Request` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, InventoryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InventoryError::Request(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, product_id: ProductId) -> Result<T, InventoryError> {
        let url = format!("{}/{}/{}", self.base_url, path, product_id);
        debug!(%url, "Sending request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| InventoryError::Request(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| InventoryError::Decode(e.to_string())),
            StatusCode::NOT_FOUND => Err(InventoryError::NotFound(product_id)),
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(InventoryError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl InventoryClient for HttpInventory {
    #[instrument(skip(self))]
    async fn get_stock(&self, product_id: ProductId) -> Result<u32, InventoryError> {
        let stock: Stock = self.fetch("stock", product_id).await?;
        Ok(stock.amount)
    }

    #[instrument(skip(self))]
    async fn get_product(&self, product_id: ProductId) -> Result<Product, InventoryError> {
        self.fetch("products", product_id).await
    }
}
