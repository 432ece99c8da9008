//! # Mock Framework
//!
//! Utilities for testing the cart service in isolation.
//!
//! Use [`create_mock_inventory`] to get an inventory and a receiver of the
//! calls made against it. Then use [`expect_stock`] or [`expect_product`] to
//! assert each call and answer it, which lets a test decide exactly when and
//! how the "remote" side responds.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::cart_actor::{CartClient, CartService, Collaborators};
use crate::domain::{Cart, Product, ProductId};
use crate::error::InventoryError;
use crate::inventory::InventoryClient;
use crate::notify::ChannelNotifier;
use crate::storage::{MemoryStore, DEFAULT_CART_KEY};

pub type Reply<T> = oneshot::Sender<Result<T, InventoryError>>;

/// A call made against a [`MockInventory`].
#[derive(Debug)]
pub enum InventoryCall {
    Stock { product_id: ProductId, respond_to: Reply<u32> },
    Product { product_id: ProductId, respond_to: Reply<Product> },
}

/// Inventory whose answers are supplied by the test through the call receiver.
#[derive(Clone)]
pub struct MockInventory {
    sender: mpsc::Sender<InventoryCall>,
}

/// Creates a mock inventory and a receiver for asserting calls.
pub fn create_mock_inventory(buffer_size: usize) -> (MockInventory, mpsc::Receiver<InventoryCall>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (MockInventory { sender }, receiver)
}

impl MockInventory {
    async fn call<T>(&self, make: impl FnOnce(Reply<T>) -> InventoryCall) -> Result<T, InventoryError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| InventoryError::Unavailable("Mock closed".to_string()))?;
        response
            .await
            .map_err(|_| InventoryError::Unavailable("Mock dropped call".to_string()))?
    }
}

#[async_trait]
impl InventoryClient for MockInventory {
    async fn get_stock(&self, product_id: ProductId) -> Result<u32, InventoryError> {
        self.call(|respond_to| InventoryCall::Stock { product_id, respond_to }).await
    }

    async fn get_product(&self, product_id: ProductId) -> Result<Product, InventoryError> {
        self.call(|respond_to| InventoryCall::Product { product_id, respond_to }).await
    }
}

/// Helper to verify that the next call is a stock lookup
pub async fn expect_stock(receiver: &mut mpsc::Receiver<InventoryCall>) -> Option<(ProductId, Reply<u32>)> {
    match receiver.recv().await {
        Some(InventoryCall::Stock { product_id, respond_to }) => Some((product_id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a product lookup
pub async fn expect_product(receiver: &mut mpsc::Receiver<InventoryCall>) -> Option<(ProductId, Reply<Product>)> {
    match receiver.recv().await {
        Some(InventoryCall::Product { product_id, respond_to }) => Some((product_id, respond_to)),
        _ => None,
    }
}

/// Catalog record used throughout the tests.
pub fn sneaker(id: ProductId) -> Product {
    Product::new(
        id,
        format!("Tênis de Caminhada {id}"),
        100.0 + f64::from(id),
        format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
    )
}

/// A running cart service wired to an in-memory store and a channel notifier.
pub struct TestCart {
    pub client: CartClient,
    pub store: Arc<MemoryStore>,
    pub notices: mpsc::UnboundedReceiver<String>,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestCart {
    pub async fn start(inventory: impl InventoryClient + 'static, cart: Cart) -> Self {
        let store = Arc::new(MemoryStore::new());
        let (notifier, notices) = ChannelNotifier::new();
        let collaborators = Collaborators::new(inventory, store.clone(), notifier);

        let (service, client) = CartService::new(8, DEFAULT_CART_KEY, cart, collaborators);
        let handle = tokio::spawn(service.run());

        Self {
            client,
            store,
            notices,
            _handle: handle,
        }
    }

    /// The cart currently in storage, if any mutation has been persisted.
    pub async fn persisted(&self) -> Option<Cart> {
        let raw = self.store.raw(DEFAULT_CART_KEY).await?;
        serde_json::from_str(&raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_inventory() {
        let (inventory, mut receiver) = create_mock_inventory(4);

        let task = tokio::spawn(async move { inventory.get_stock(7).await });

        let (product_id, responder) = expect_stock(&mut receiver).await.expect("Expected stock lookup");
        assert_eq!(product_id, 7);
        responder.send(Ok(12)).unwrap();

        assert_eq!(task.await.unwrap(), Ok(12));
    }

    #[tokio::test]
    async fn test_mock_inventory_reports_dropped_call() {
        let (inventory, mut receiver) = create_mock_inventory(4);

        let task = tokio::spawn(async move { inventory.get_product(1).await });
        let (_, responder) = expect_product(&mut receiver).await.expect("Expected product lookup");
        drop(responder);

        assert!(matches!(task.await.unwrap(), Err(InventoryError::Unavailable(_))));
    }
}
