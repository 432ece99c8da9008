use thiserror::Error;

use crate::domain::ProductId;

/// Failures of the remote inventory/product service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    #[error("Product not found in inventory: {0}")]
    NotFound(ProductId),
    #[error("Inventory request failed: {0}")]
    Request(String),
    #[error("Inventory returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Inventory response could not be decoded: {0}")]
    Decode(String),
    #[error("Inventory unavailable: {0}")]
    Unavailable(String),
}

/// Failures of the persistent key-value store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e.to_string())
    }
}

/// A line-item list that breaks the cart's invariants.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvalidCart {
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),
    #[error("product {0} has amount 0")]
    ZeroAmount(ProductId),
}

/// Errors returned by cart operations and cart startup.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Requested quantity out of stock for product {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },
    #[error("Product not in cart: {0}")]
    NotFound(ProductId),
    #[error(transparent)]
    Remote(#[from] InventoryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Cart serialization error: {0}")]
    Serialization(String),
    #[error("Persisted cart could not be parsed: {0}")]
    CorruptState(String),
    #[error("Cart service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Coarse classification of a [`CartError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    OutOfStock,
    NotFound,
    RemoteFailure,
    Storage,
    Internal,
}

impl CartError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::OutOfStock { .. } => ErrorKind::OutOfStock,
            CartError::NotFound(_) => ErrorKind::NotFound,
            CartError::Remote(_) => ErrorKind::RemoteFailure,
            CartError::Storage(_) | CartError::CorruptState(_) => ErrorKind::Storage,
            CartError::Serialization(_) | CartError::ServiceUnavailable(_) => ErrorKind::Internal,
        }
    }
}

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_follow_taxonomy() {
        let out_of_stock = CartError::OutOfStock { product_id: 1, requested: 3, available: 2 };
        assert_eq!(out_of_stock.kind(), ErrorKind::OutOfStock);
        assert_eq!(CartError::NotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(CartError::from(InventoryError::NotFound(1)).kind(), ErrorKind::RemoteFailure);
        assert_eq!(CartError::from(StorageError::Io("disk full".into())).kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_remote_error_message_is_transparent() {
        let err = CartError::from(InventoryError::Request("connection refused".into()));
        assert_eq!(err.to_string(), "Inventory request failed: connection refused");
    }
}
