//! cart-api — data model, error taxonomy and REST client for the cart backend

pub mod client;
pub mod config;
pub mod error;
pub mod model;

pub use client::{ApiClient, CartBackend};
pub use config::ApiConfig;
pub use error::ApiError;
pub use model::{AmountPatch, CartItem, InventoryItem, ItemId, NewCartItem};
