use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::product::{Product, ProductId};
use crate::error::InvalidCart;

/// One product entry in the cart plus its quantity.
///
/// Serializes as the product's catalog fields with an extra `amount` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl CartLineItem {
    pub fn new(product: Product, amount: u32) -> Self {
        Self { product, amount }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }

    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.amount)
    }
}

/// Ordered list of line items, unique by product id, in insertion order.
///
/// Stored as a bare JSON array. Deserializing rejects duplicate ids and zero
/// amounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == product_id)
    }

    /// Amount currently in the cart for `product_id`, 0 when absent.
    pub fn amount_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |item| item.amount)
    }

    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }

    /// Product id to amount, the shape product grids use for their badges.
    pub fn amounts_by_product(&self) -> HashMap<ProductId, u32> {
        self.items.iter().map(|item| (item.id(), item.amount)).collect()
    }

    /// Appends a new line item. Returns `false` if the product is already present.
    pub(crate) fn push(&mut self, item: CartLineItem) -> bool {
        if self.get(item.id()).is_some() {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Sets the amount of an existing line item. Returns `false` if absent.
    pub(crate) fn set_amount(&mut self, product_id: ProductId, amount: u32) -> bool {
        match self.items.iter_mut().find(|item| item.id() == product_id) {
            Some(item) => {
                item.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Removes a line item, keeping the relative order of the rest.
    pub(crate) fn remove(&mut self, product_id: ProductId) -> Option<CartLineItem> {
        let index = self.items.iter().position(|item| item.id() == product_id)?;
        Some(self.items.remove(index))
    }
}

impl FromIterator<CartLineItem> for Cart {
    fn from_iter<I: IntoIterator<Item = CartLineItem>>(iter: I) -> Self {
        let mut cart = Cart::new();
        for item in iter {
            cart.push(item);
        }
        cart
    }
}

impl TryFrom<Vec<CartLineItem>> for Cart {
    type Error = InvalidCart;

    fn try_from(items: Vec<CartLineItem>) -> Result<Self, Self::Error> {
        let mut cart = Cart::new();
        for item in items {
            if item.amount == 0 {
                return Err(InvalidCart::ZeroAmount(item.id()));
            }
            let id = item.id();
            if !cart.push(item) {
                return Err(InvalidCart::DuplicateProduct(id));
            }
        }
        Ok(cart)
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sneaker(id: ProductId, price: f64) -> Product {
        Product::new(id, format!("Sneaker {id}"), price, format!("https://example.com/{id}.jpg"))
    }

    #[test]
    fn test_cart_round_trips_through_json() {
        let cart: Cart = vec![
            CartLineItem::new(sneaker(2, 139.9), 3),
            CartLineItem::new(sneaker(1, 179.9).with_field("color", "black"), 1),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
        assert_eq!(back.items()[0].id(), 2);
    }

    #[test]
    fn test_line_item_serializes_flat_with_amount() {
        let item = CartLineItem::new(sneaker(1, 10.0), 2);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "title": "Sneaker 1",
                "price": 10.0,
                "image": "https://example.com/1.jpg",
                "amount": 2
            })
        );
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut cart: Cart = (1..=4).map(|id| CartLineItem::new(sneaker(id, 1.0), 1)).collect();

        let removed = cart.remove(2).unwrap();
        assert_eq!(removed.id(), 2);
        let ids: Vec<_> = cart.iter().map(CartLineItem::id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert!(cart.remove(2).is_none());
    }

    #[test]
    fn test_push_rejects_duplicate_ids() {
        let mut cart = Cart::new();
        assert!(cart.push(CartLineItem::new(sneaker(1, 1.0), 1)));
        assert!(!cart.push(CartLineItem::new(sneaker(1, 1.0), 5)));
        assert_eq!(cart.amount_of(1), 1);
    }

    #[test]
    fn test_totals() {
        let cart: Cart = vec![
            CartLineItem::new(sneaker(1, 10.0), 2),
            CartLineItem::new(sneaker(2, 2.5), 4),
        ]
        .into_iter()
        .collect();

        assert_eq!(cart.total_units(), 6);
        assert!((cart.total() - 30.0).abs() < f64::EPSILON);
        assert_eq!(cart.amounts_by_product().get(&2), Some(&4));
        assert_eq!(cart.amount_of(9), 0);
    }

    #[test]
    fn test_deserialize_rejects_broken_invariants() {
        let line = |id: u32, amount: u32| CartLineItem::new(sneaker(id, 1.0), amount);

        assert_eq!(
            Cart::try_from(vec![line(1, 2), line(1, 1)]),
            Err(InvalidCart::DuplicateProduct(1))
        );
        assert_eq!(Cart::try_from(vec![line(1, 2), line(2, 0)]), Err(InvalidCart::ZeroAmount(2)));

        let json = serde_json::to_string(&vec![line(3, 0)]).unwrap();
        assert!(serde_json::from_str::<Cart>(&json).is_err());
    }
}
