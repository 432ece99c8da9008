use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::InventoryClient;
use crate::domain::{Product, ProductId};
use crate::error::InventoryError;
use crate::messages::{InventoryRequest, ServiceResponse};

/// In-process inventory actor: a catalog with stock levels.
///
/// Stands in for the remote inventory in local runs and tests. It can be
/// switched offline to exercise the cart's remote-failure path.
pub struct InventoryService {
    receiver: mpsc::Receiver<InventoryRequest>,
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, u32>,
    offline: bool,
}

impl InventoryService {
    pub fn new(buffer_size: usize) -> (Self, InventoryHandle) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let service = Self {
            receiver,
            products: HashMap::new(),
            stock: HashMap::new(),
            offline: false,
        };
        let handle = InventoryHandle::new(sender);
        (service, handle)
    }

    /// Seed the catalog before the service starts.
    pub fn with_product(mut self, product: Product, stock: u32) -> Self {
        self.stock.insert(product.id, stock);
        self.products.insert(product.id, product);
        self
    }

    #[instrument(name = "inventory_service", skip(self))]
    pub async fn run(mut self) {
        info!(products = self.products.len(), "InventoryService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                InventoryRequest::GetProduct { product_id, respond_to } => {
                    self.handle_get_product(product_id, respond_to);
                }
                InventoryRequest::CheckStock { product_id, respond_to } => {
                    self.handle_check_stock(product_id, respond_to);
                }
                InventoryRequest::UpsertProduct { product, stock, respond_to } => {
                    self.handle_upsert_product(product, stock, respond_to);
                }
                InventoryRequest::SetStock { product_id, stock, respond_to } => {
                    self.handle_set_stock(product_id, stock, respond_to);
                }
                InventoryRequest::SetOffline { offline, respond_to } => {
                    info!(offline, "Inventory availability changed");
                    self.offline = offline;
                    let _ = respond_to.send(Ok(()));
                }
                InventoryRequest::Shutdown => {
                    info!("InventoryService shutting down");
                    break;
                }
            }
        }

        info!("InventoryService stopped");
    }

    fn ensure_online(&self) -> Result<(), InventoryError> {
        if self.offline {
            warn!("Inventory offline");
            return Err(InventoryError::Unavailable("Inventory offline".to_string()));
        }
        Ok(())
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    fn handle_get_product(&self, product_id: ProductId, respond_to: ServiceResponse<Product, InventoryError>) {
        debug!("Processing get_product request");

        let result = self.ensure_online().and_then(|()| {
            self.products
                .get(&product_id)
                .cloned()
                .ok_or(InventoryError::NotFound(product_id))
        });

        match &result {
            Ok(product) => debug!(title = %product.title, price = %product.price, "Product found"),
            Err(e) => debug!(error = %e, "Product lookup failed"),
        }

        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    fn handle_check_stock(&self, product_id: ProductId, respond_to: ServiceResponse<u32, InventoryError>) {
        debug!("Processing check_stock request");

        let result = self.ensure_online().and_then(|()| {
            self.stock
                .get(&product_id)
                .copied()
                .ok_or(InventoryError::NotFound(product_id))
        });

        if let Ok(stock) = result {
            debug!(stock_level = stock, "Stock checked");
        }

        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %product.id, stock = %stock), skip(self, product, respond_to))]
    fn handle_upsert_product(&mut self, product: Product, stock: u32, respond_to: ServiceResponse<(), InventoryError>) {
        self.stock.insert(product.id, stock);
        self.products.insert(product.id, product);
        info!("Product stored");
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(product_id = %product_id, stock = %stock), skip(self, respond_to))]
    fn handle_set_stock(&mut self, product_id: ProductId, stock: u32, respond_to: ServiceResponse<(), InventoryError>) {
        let result = match self.stock.get_mut(&product_id) {
            Some(level) => {
                *level = stock;
                info!("Stock level updated");
                Ok(())
            }
            None => Err(InventoryError::NotFound(product_id)),
        };
        let _ = respond_to.send(result);
    }
}

/// Handle to a running [`InventoryService`].
#[derive(Clone)]
pub struct InventoryHandle {
    sender: mpsc::Sender<InventoryRequest>,
}

impl InventoryHandle {
    pub fn new(sender: mpsc::Sender<InventoryRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), InventoryError> {
        debug!("Sending shutdown request");
        self.sender
            .send(InventoryRequest::Shutdown)
            .await
            .map_err(|e| InventoryError::Unavailable(e.to_string()))
    }
}

client_method!(InventoryHandle => fn fetch_product(product_id: ProductId) -> Product as InventoryRequest::GetProduct, Error = InventoryError::Unavailable);
client_method!(InventoryHandle => fn check_stock(product_id: ProductId) -> u32 as InventoryRequest::CheckStock, Error = InventoryError::Unavailable);
client_method!(InventoryHandle => fn upsert_product(product: Product, stock: u32) -> () as InventoryRequest::UpsertProduct, Error = InventoryError::Unavailable);
client_method!(InventoryHandle => fn set_stock(product_id: ProductId, stock: u32) -> () as InventoryRequest::SetStock, Error = InventoryError::Unavailable);
client_method!(InventoryHandle => fn set_offline(offline: bool) -> () as InventoryRequest::SetOffline, Error = InventoryError::Unavailable);

#[async_trait]
impl InventoryClient for InventoryHandle {
    async fn get_stock(&self, product_id: ProductId) -> Result<u32, InventoryError> {
        self.check_stock(product_id).await
    }

    async fn get_product(&self, product_id: ProductId) -> Result<Product, InventoryError> {
        self.fetch_product(product_id).await
    }
}
