use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::domain::{Cart, ProductId};
use crate::error::CartError;
use crate::messages::CartRequest;

/// Handle to a running [`CartService`](super::CartService).
///
/// Cheap to clone. Mutations are answered with the cart as committed after
/// the request; failures come back as [`CartError`] after the shopper has
/// already been notified.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
    snapshots: watch::Receiver<Cart>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>, snapshots: watch::Receiver<Cart>) -> Self {
        Self { sender, snapshots }
    }

    /// Latest committed cart, without queueing behind pending mutations.
    pub fn snapshot(&self) -> Cart {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is marked changed after every committed mutation.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        let mut receiver = self.snapshots.clone();
        receiver.borrow_and_update();
        receiver
    }

    /// Run `callback` with each committed cart until the service stops.
    pub fn on_change<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: Fn(&Cart) + Send + 'static,
    {
        let mut receiver = self.subscribe();
        tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                let cart = receiver.borrow_and_update().clone();
                callback(&cart);
            }
        })
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending shutdown request");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|e| CartError::ServiceUnavailable(e.to_string()))
    }
}

client_method!(CartClient => fn add_product(product_id: ProductId) -> Cart as CartRequest::AddProduct, Error = CartError::ServiceUnavailable);
client_method!(CartClient => fn remove_product(product_id: ProductId) -> Cart as CartRequest::RemoveProduct, Error = CartError::ServiceUnavailable);
client_method!(CartClient => fn update_product_amount(product_id: ProductId, amount: i64) -> Cart as CartRequest::UpdateProductAmount, Error = CartError::ServiceUnavailable);
client_method!(CartClient => fn get_cart() -> Cart as CartRequest::GetCart, Error = CartError::ServiceUnavailable);
