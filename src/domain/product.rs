use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Catalog identifier of a product.
pub type ProductId = u32;

/// Represents a product in the storefront catalog.
///
/// Fields the cart does not interpret (descriptions, slugs, ...) are kept in
/// `extra` so a product read from the inventory survives a trip through
/// storage unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "name")]
    pub title: String,
    pub price: f64,
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn new(id: ProductId, title: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
            extra: Map::new(),
        }
    }

    /// Attaches an extra catalog field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Stock record as served by the inventory (`{"id": 1, "amount": 3}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_keeps_unknown_catalog_fields() {
        let raw = json!({
            "id": 3,
            "title": "Tênis Adidas Duramo Lite 2.0",
            "price": 219.9,
            "image": "https://example.com/3.jpg",
            "brand": "adidas"
        });

        let product: Product = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(product.id, 3);
        assert_eq!(product.extra.get("brand"), Some(&json!("adidas")));
        assert_eq!(serde_json::to_value(&product).unwrap(), raw);
    }
}
