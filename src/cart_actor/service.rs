use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

use super::{CartClient, CartOperation, Collaborators};
use crate::domain::{Cart, CartLineItem, ProductId};
use crate::error::{CartError, InventoryError};
use crate::messages::{CartRequest, ServiceResponse};
use crate::storage::persist_cart;

/// Cart actor. Holds the committed cart and mirrors it to storage.
///
/// Every mutation works on a copy of the cart and only commits it after the
/// inventory has answered and the copy has been persisted. A failed mutation
/// leaves memory, storage and subscribers untouched and produces exactly one
/// notification.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    cart: Cart,
    storage_key: String,
    collaborators: Collaborators,
    updates: watch::Sender<Cart>,
}

impl CartService {
    pub fn new(
        buffer_size: usize,
        storage_key: impl Into<String>,
        cart: Cart,
        collaborators: Collaborators,
    ) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let (updates, snapshots) = watch::channel(cart.clone());
        let service = Self {
            receiver,
            cart,
            storage_key: storage_key.into(),
            collaborators,
            updates,
        };
        let client = CartClient::new(sender, snapshots);
        (service, client)
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!(items = self.cart.len(), "CartService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::AddProduct { product_id, respond_to } => {
                    self.handle_add_product(product_id, respond_to).await;
                }
                CartRequest::RemoveProduct { product_id, respond_to } => {
                    self.handle_remove_product(product_id, respond_to).await;
                }
                CartRequest::UpdateProductAmount { product_id, amount, respond_to } => {
                    self.handle_update_product_amount(product_id, amount, respond_to).await;
                }
                CartRequest::GetCart { respond_to } => {
                    let _ = respond_to.send(Ok(self.cart.clone()));
                }
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }

        info!("CartService stopped");
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    async fn handle_add_product(&mut self, product_id: ProductId, respond_to: ServiceResponse<Cart, CartError>) {
        debug!("Processing add_product request");
        let result = self.add_product(product_id).await;
        self.finish(CartOperation::AddProduct, result, respond_to);
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    async fn handle_remove_product(&mut self, product_id: ProductId, respond_to: ServiceResponse<Cart, CartError>) {
        debug!("Processing remove_product request");
        let result = self.remove_product(product_id).await;
        self.finish(CartOperation::RemoveProduct, result, respond_to);
    }

    #[instrument(fields(product_id = %product_id, amount = %amount), skip(self, respond_to))]
    async fn handle_update_product_amount(
        &mut self,
        product_id: ProductId,
        amount: i64,
        respond_to: ServiceResponse<Cart, CartError>,
    ) {
        debug!("Processing update_product_amount request");
        let result = self.update_product_amount(product_id, amount).await;
        self.finish(CartOperation::UpdateProductAmount, result, respond_to);
    }

    async fn add_product(&self, product_id: ProductId) -> Result<Option<Cart>, CartError> {
        let current = self.cart.get(product_id).map(|item| item.amount);
        let stock = self.collaborators.inventory.get_stock(product_id).await?;

        let desired = current.unwrap_or(0).saturating_add(1);
        if desired > stock {
            return Err(CartError::OutOfStock {
                product_id,
                requested: u64::from(desired),
                available: stock,
            });
        }

        let mut updated = self.cart.clone();
        if current.is_some() {
            updated.set_amount(product_id, desired);
        } else {
            let product = self.collaborators.inventory.get_product(product_id).await?;
            if product.id != product_id {
                return Err(InventoryError::Decode(format!(
                    "requested product {product_id}, received product {}",
                    product.id
                ))
                .into());
            }
            updated.push(CartLineItem::new(product, 1));
        }

        self.persist(&updated).await?;
        Ok(Some(updated))
    }

    async fn remove_product(&self, product_id: ProductId) -> Result<Option<Cart>, CartError> {
        let mut updated = self.cart.clone();
        updated.remove(product_id).ok_or(CartError::NotFound(product_id))?;

        self.persist(&updated).await?;
        Ok(Some(updated))
    }

    async fn update_product_amount(&self, product_id: ProductId, amount: i64) -> Result<Option<Cart>, CartError> {
        if amount <= 0 {
            debug!("Non-positive amount, nothing to do");
            return Ok(None);
        }
        let requested = amount.unsigned_abs();

        let current = self
            .cart
            .get(product_id)
            .map(|item| item.amount)
            .ok_or(CartError::NotFound(product_id))?;

        // Decreases never consult the inventory.
        let new_amount = match u32::try_from(requested) {
            Ok(wanted) if wanted <= current => wanted,
            _ => {
                let stock = self.collaborators.inventory.get_stock(product_id).await?;
                match u32::try_from(requested) {
                    Ok(wanted) if wanted <= stock => wanted,
                    _ => {
                        return Err(CartError::OutOfStock {
                            product_id,
                            requested,
                            available: stock,
                        })
                    }
                }
            }
        };

        let mut updated = self.cart.clone();
        updated.set_amount(product_id, new_amount);

        self.persist(&updated).await?;
        Ok(Some(updated))
    }

    async fn persist(&self, cart: &Cart) -> Result<(), CartError> {
        persist_cart(self.collaborators.store.as_ref(), &self.storage_key, cart).await
    }

    /// Commit a successful mutation, or report a failed one. Replies with the
    /// cart as it stands afterwards.
    fn finish(
        &mut self,
        operation: CartOperation,
        result: Result<Option<Cart>, CartError>,
        respond_to: ServiceResponse<Cart, CartError>,
    ) {
        let reply = match result {
            Ok(Some(cart)) => {
                info!(items = cart.len(), units = cart.total_units(), "Cart updated");
                self.cart = cart;
                self.updates.send_replace(self.cart.clone());
                Ok(self.cart.clone())
            }
            Ok(None) => Ok(self.cart.clone()),
            Err(e) => {
                warn!(error = %e, ?operation, "Cart operation rejected");
                self.collaborators.notifier.report_error(operation.notice_for(&e));
                Err(e)
            }
        };

        let _ = respond_to.send(reply);
    }
}
