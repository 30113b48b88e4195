use cart_api::ItemId;
use serde::Deserialize;

/// A click the page script forwards to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Decrease(ItemId),
    Increase(ItemId),
    AddToCart(ItemId),
    Delete(ItemId),
    Checkout,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActionPayload {
    #[serde(default)]
    pub id: Option<ItemId>,
}

#[derive(Debug, Deserialize)]
struct ActionEnvelope {
    action: String,
    #[serde(default)]
    payload: ActionPayload,
}

#[derive(Debug, PartialEq)]
pub enum ActionError {
    Unknown(String),
    MissingId(&'static str),
    Malformed(String),
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(name) => write!(f, "unknown action '{}'", name),
            Self::MissingId(name) => write!(f, "action '{}' needs an item id", name),
            Self::Malformed(e) => write!(f, "malformed action: {}", e),
        }
    }
}

impl std::error::Error for ActionError {}

impl UiAction {
    /// Build an action from its name (the button class) and payload.
    pub fn from_parts(name: &str, payload: ActionPayload) -> Result<Self, ActionError> {
        let with_id = |make: fn(ItemId) -> UiAction, name: &'static str| {
            payload.id.clone().map(make).ok_or(ActionError::MissingId(name))
        };
        match name {
            "decrease" => with_id(UiAction::Decrease, "decrease"),
            "increase" => with_id(UiAction::Increase, "increase"),
            "add-to-cart" => with_id(UiAction::AddToCart, "add-to-cart"),
            "delete" => with_id(UiAction::Delete, "delete"),
            "checkout" => Ok(UiAction::Checkout),
            other => Err(ActionError::Unknown(other.to_string())),
        }
    }

    /// Parse `{"action":"name","payload":{"id":...}}`.
    pub fn parse(input: &[u8]) -> Result<Self, ActionError> {
        let envelope: ActionEnvelope =
            serde_json::from_slice(input).map_err(|e| ActionError::Malformed(e.to_string()))?;
        Self::from_parts(&envelope.action, envelope.payload)
    }

    pub fn name(&self) -> &'static str {
        match self {
            UiAction::Decrease(_) => "decrease",
            UiAction::Increase(_) => "increase",
            UiAction::AddToCart(_) => "add-to-cart",
            UiAction::Delete(_) => "delete",
            UiAction::Checkout => "checkout",
        }
    }
}
