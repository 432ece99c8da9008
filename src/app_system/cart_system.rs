use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use super::CartConfig;
use crate::cart_actor::{CartClient, CartService, Collaborators};
use crate::error::CartError;
use crate::storage::load_cart;

/// Owns the running cart service.
///
/// Startup loads the persisted cart before the service accepts requests;
/// shutdown drains the mailbox up to the shutdown request and waits for the
/// service task. UI code receives the [`CartClient`] rather than reaching for
/// a global.
pub struct CartSystem {
    pub cart_client: CartClient,
    handle: JoinHandle<()>,
}

impl CartSystem {
    /// Load the persisted cart and start the cart service.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the store cannot be read, or
    /// `CartError::CorruptState` if the stored cart is unreadable and the
    /// configured policy is to fail.
    #[instrument(name = "cart_system", skip_all, fields(storage_key = %config.storage_key))]
    pub async fn start(config: &CartConfig, collaborators: Collaborators) -> Result<Self, CartError> {
        info!("Starting cart system");

        let cart = load_cart(collaborators.store.as_ref(), &config.storage_key, config.corrupt_state).await?;
        let (service, cart_client) =
            CartService::new(config.mailbox_size, config.storage_key.clone(), cart, collaborators);
        let handle = tokio::spawn(service.run());

        info!("Cart system started successfully");
        Ok(Self { cart_client, handle })
    }

    pub fn client(&self) -> CartClient {
        self.cart_client.clone()
    }

    /// Gracefully shut down the cart service.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), CartError> {
        info!("Shutting down cart system");

        let _ = self.cart_client.shutdown().await;
        if let Err(e) = self.handle.await {
            error!(error = ?e, "Service shutdown error");
            return Err(CartError::ServiceUnavailable(e.to_string()));
        }

        info!("Cart system shutdown complete");
        Ok(())
    }
}
