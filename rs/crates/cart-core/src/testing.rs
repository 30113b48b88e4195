//! In-memory backend double that records every call.

use std::sync::Mutex;

use cart_api::{ApiError, CartBackend, CartItem, InventoryItem, ItemId, NewCartItem};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetCart,
    GetInventory,
    AddToCart(NewCartItem),
    UpdateCart(ItemId, u32),
    DeleteFromCart(ItemId),
}

struct Inner {
    inventory: Vec<InventoryItem>,
    cart: Vec<CartItem>,
    next_cart_id: u64,
    calls: Vec<Call>,
    failure: Option<ApiError>,
}

pub struct FakeBackend {
    inner: Mutex<Inner>,
}

impl FakeBackend {
    /// Inventory ids are 1..=n; cart ids start at 100 so the two never collide.
    pub fn with_inventory(names: &[&str]) -> Self {
        let inventory = names
            .iter()
            .enumerate()
            .map(|(i, name)| InventoryItem {
                id: ItemId::from(i as u64 + 1),
                content: name.to_string(),
                amount: 0,
            })
            .collect();
        Self {
            inner: Mutex::new(Inner {
                inventory,
                cart: Vec::new(),
                next_cart_id: 100,
                calls: Vec::new(),
                failure: None,
            }),
        }
    }

    pub fn set_inventory_amount(&self, id: u64, amount: u32) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(item) = inner.inventory.iter_mut().find(|i| i.id == ItemId::from(id)) {
            item.amount = amount;
        }
    }

    pub fn seed_cart(&self, content: &str, amount: u32) -> ItemId {
        let mut inner = self.inner.lock().unwrap();
        let id = ItemId::from(inner.next_cart_id);
        inner.next_cart_id += 1;
        inner.cart.push(CartItem { id: id.clone(), content: content.into(), amount });
        id
    }

    /// Make the next backend operation fail with `err`.
    pub fn fail_next(&self, err: ApiError) {
        self.inner.lock().unwrap().failure = Some(err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    fn begin(&self, call: Option<Call>) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(call) = call {
            inner.calls.push(call);
        }
        match inner.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl CartBackend for FakeBackend {
    async fn get_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        self.begin(Some(Call::GetCart))?;
        tokio::task::yield_now().await;
        Ok(self.inner.lock().unwrap().cart.clone())
    }

    async fn get_inventory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        self.begin(Some(Call::GetInventory))?;
        tokio::task::yield_now().await;
        Ok(self.inner.lock().unwrap().inventory.clone())
    }

    async fn add_to_cart(&self, item: NewCartItem) -> Result<CartItem, ApiError> {
        self.begin(Some(Call::AddToCart(item.clone())))?;
        tokio::task::yield_now().await;
        let mut inner = self.inner.lock().unwrap();
        let created = CartItem {
            id: ItemId::from(inner.next_cart_id),
            content: item.content,
            amount: item.amount,
        };
        inner.next_cart_id += 1;
        inner.cart.push(created.clone());
        Ok(created)
    }

    async fn update_cart(&self, id: &ItemId, amount: u32) -> Result<CartItem, ApiError> {
        self.begin(Some(Call::UpdateCart(id.clone(), amount)))?;
        tokio::task::yield_now().await;
        let mut inner = self.inner.lock().unwrap();
        let row = inner
            .cart
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("/cart/{}", id)))?;
        row.amount = amount;
        Ok(row.clone())
    }

    async fn delete_from_cart(&self, id: &ItemId) -> Result<Value, ApiError> {
        self.begin(Some(Call::DeleteFromCart(id.clone())))?;
        tokio::task::yield_now().await;
        let mut inner = self.inner.lock().unwrap();
        let before = inner.cart.len();
        inner.cart.retain(|c| &c.id != id);
        if inner.cart.len() == before {
            return Err(ApiError::NotFound(format!("/cart/{}", id)));
        }
        Ok(serde_json::json!({}))
    }

    async fn checkout(&self) -> Result<Vec<Value>, ApiError> {
        self.begin(None)?;
        let cart = self.get_cart().await?;
        let mut results = Vec::with_capacity(cart.len());
        for item in cart {
            results.push(self.delete_from_cart(&item.id).await?);
        }
        Ok(results)
    }
}
