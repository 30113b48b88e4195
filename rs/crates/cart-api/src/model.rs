use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-assigned identifier.
///
/// json-server style backends hand out either numbers or strings, so both are
/// accepted and kept in their textual form. Two ids are equal when they print
/// the same, which lets a `data-id="3"` attribute match a numeric `3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => ItemId(n.to_string()),
            RawId::Text(s) => ItemId(s),
        })
    }
}

/// A catalog entry. `amount` is the local pending quantity, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub content: String,
    #[serde(default)]
    pub amount: u32,
}

/// A persisted cart entry with its committed quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ItemId,
    pub content: String,
    pub amount: u32,
}

/// Body of `POST /cart`; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub content: String,
    pub amount: u32,
}

/// Body of `PATCH /cart/:id`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmountPatch {
    pub amount: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_accept_numbers_and_strings() {
        let items: Vec<CartItem> = serde_json::from_str(
            r#"[{"id":1,"content":"Apple","amount":2},{"id":"a9f3","content":"Pear","amount":1}]"#,
        )
        .unwrap();
        assert_eq!(items[0].id, ItemId::from(1));
        assert_eq!(items[0].id.to_string(), "1");
        assert_eq!(items[1].id.as_str(), "a9f3");
    }

    #[test]
    fn inventory_amount_defaults_to_zero() {
        let item: InventoryItem = serde_json::from_str(r#"{"id":4,"content":"Kiwi"}"#).unwrap();
        assert_eq!(item.amount, 0);
    }

    #[test]
    fn new_item_serializes_without_id() {
        let body = serde_json::to_value(NewCartItem { content: "Apple".into(), amount: 2 }).unwrap();
        assert_eq!(body, serde_json::json!({"content": "Apple", "amount": 2}));
    }
}
