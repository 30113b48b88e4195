//! cart-backend — in-memory stand-in for the cart REST backend
//!
//! Serves the same five routes a json-server `db.json` with `inventory` and
//! `cart` collections would: list both collections, create, patch and delete
//! cart rows. Ids are numeric and never reused.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

// ── Records ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: u64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartRecord {
    pub id: u64,
    pub content: String,
    pub amount: u32,
}

#[derive(Debug, Deserialize)]
pub struct CreateCartRequest {
    pub content: String,
    pub amount: u32,
}

#[derive(Debug, Deserialize)]
pub struct PatchCartRequest {
    pub amount: u32,
}

/// On-disk seed format, the same shape as a json-server `db.json`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Seed {
    #[serde(default)]
    pub inventory: Vec<InventoryRecord>,
    #[serde(default)]
    pub cart: Vec<CartRecord>,
}

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
pub enum BackendError {
    NotFound(String),
    BadRequest(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(e) => write!(f, "not found: {}", e),
            Self::BadRequest(e) => write!(f, "bad request: {}", e),
        }
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            Self::NotFound(e) => (StatusCode::NOT_FOUND, e.as_str()),
            Self::BadRequest(e) => (StatusCode::BAD_REQUEST, e.as_str()),
        };
        let body = serde_json::json!({ "error": msg });
        (status, Json(body)).into_response()
    }
}

// ── Store ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Store {
    inventory: Vec<InventoryRecord>,
    cart: Vec<CartRecord>,
    next_id: u64,
}

pub type SharedStore = Arc<Mutex<Store>>;

impl Store {
    pub fn new(seed: Seed) -> Self {
        let max_cart_id = seed.cart.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            inventory: seed.inventory,
            cart: seed.cart,
            next_id: max_cart_id + 1,
        }
    }

    pub fn shared(seed: Seed) -> SharedStore {
        Arc::new(Mutex::new(Self::new(seed)))
    }

    pub fn inventory(&self) -> &[InventoryRecord] {
        &self.inventory
    }

    pub fn cart(&self) -> &[CartRecord] {
        &self.cart
    }

    pub fn create(&mut self, req: CreateCartRequest) -> Result<CartRecord, BackendError> {
        let content = req.content.trim();
        if content.is_empty() {
            return Err(BackendError::BadRequest("content must not be empty".into()));
        }
        let record = CartRecord {
            id: self.next_id,
            content: content.to_string(),
            amount: req.amount,
        };
        self.next_id += 1;
        self.cart.push(record.clone());
        Ok(record)
    }

    pub fn patch(&mut self, id: &str, req: PatchCartRequest) -> Result<CartRecord, BackendError> {
        let idx = self.position(id)?;
        self.cart[idx].amount = req.amount;
        Ok(self.cart[idx].clone())
    }

    pub fn delete(&mut self, id: &str) -> Result<CartRecord, BackendError> {
        let idx = self.position(id)?;
        Ok(self.cart.remove(idx))
    }

    fn position(&self, id: &str) -> Result<usize, BackendError> {
        let not_found = || BackendError::NotFound(format!("cart item {}", id));
        let id: u64 = id.parse().map_err(|_| not_found())?;
        self.cart.iter().position(|r| r.id == id).ok_or_else(not_found)
    }
}

/// A small produce catalog so the dev backend is usable out of the box.
pub fn default_seed() -> Seed {
    let names = ["apple", "pineapple", "mango", "banana", "orange", "melon"];
    Seed {
        inventory: names
            .iter()
            .enumerate()
            .map(|(i, name)| InventoryRecord {
                id: i as u64 + 1,
                content: name.to_string(),
            })
            .collect(),
        cart: Vec::new(),
    }
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/inventory", get(list_inventory))
        .route("/cart", get(list_cart).post(create_cart))
        .route("/cart/:id", axum::routing::patch(patch_cart).delete(delete_cart))
        .with_state(store)
}

async fn list_inventory(State(store): State<SharedStore>) -> Json<Vec<InventoryRecord>> {
    Json(store.lock().unwrap().inventory().to_vec())
}

async fn list_cart(State(store): State<SharedStore>) -> Json<Vec<CartRecord>> {
    Json(store.lock().unwrap().cart().to_vec())
}

async fn create_cart(
    State(store): State<SharedStore>,
    Json(req): Json<CreateCartRequest>,
) -> Result<(StatusCode, Json<CartRecord>), BackendError> {
    let record = store.lock().unwrap().create(req)?;
    log::info!("[backend] created cart item {} ({} x {})", record.id, record.content, record.amount);
    Ok((StatusCode::CREATED, Json(record)))
}

async fn patch_cart(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(req): Json<PatchCartRequest>,
) -> Result<Json<CartRecord>, BackendError> {
    let record = store.lock().unwrap().patch(&id, req)?;
    log::info!("[backend] cart item {} amount -> {}", record.id, record.amount);
    Ok(Json(record))
}

async fn delete_cart(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let record = store.lock().unwrap().delete(&id)?;
    log::info!("[backend] deleted cart item {}", record.id);
    Ok(Json(serde_json::json!({})))
}
