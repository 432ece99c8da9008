use tokio::sync::oneshot;

use crate::domain::{Cart, Product, ProductId};
use crate::error::{CartError, InventoryError};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests handled by the in-process inventory service.
#[derive(Debug)]
pub enum InventoryRequest {
    GetProduct {
        product_id: ProductId,
        respond_to: ServiceResponse<Product, InventoryError>,
    },
    CheckStock {
        product_id: ProductId,
        respond_to: ServiceResponse<u32, InventoryError>,
    },
    UpsertProduct {
        product: Product,
        stock: u32,
        respond_to: ServiceResponse<(), InventoryError>,
    },
    SetStock {
        product_id: ProductId,
        stock: u32,
        respond_to: ServiceResponse<(), InventoryError>,
    },
    SetOffline {
        offline: bool,
        respond_to: ServiceResponse<(), InventoryError>,
    },
    Shutdown,
}

/// Requests handled by the cart service. Each mutation replies with the
/// committed cart.
#[derive(Debug)]
pub enum CartRequest {
    AddProduct {
        product_id: ProductId,
        respond_to: ServiceResponse<Cart, CartError>,
    },
    RemoveProduct {
        product_id: ProductId,
        respond_to: ServiceResponse<Cart, CartError>,
    },
    UpdateProductAmount {
        product_id: ProductId,
        amount: i64,
        respond_to: ServiceResponse<Cart, CartError>,
    },
    GetCart {
        respond_to: ServiceResponse<Cart, CartError>,
    },
    Shutdown,
}
