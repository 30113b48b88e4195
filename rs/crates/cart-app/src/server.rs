use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use cart_api::ApiClient;
use cart_core::{ActionPayload, Controller, Screen, SharedScreen, UiAction};

use crate::error::AppError;
use crate::page;

// ── Shared state ────────────────────────────────────────────────────

pub struct AppState {
    pub controller: Controller<ApiClient>,
    pub screen: SharedScreen,
}

impl AppState {
    /// Wire the screen to the controller so every state change repaints it.
    pub fn new(controller: Controller<ApiClient>) -> Self {
        let screen = Screen::shared();
        controller.attach_screen(screen.clone());
        Self { controller, screen }
    }

    fn current_screen(&self) -> Screen {
        self.screen.lock().unwrap().clone()
    }
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/frame", get(frame))
        .route("/actions/:name", post(action))
        .with_state(state)
}

// ── Handlers ────────────────────────────────────────────────────────

async fn health() -> &'static str {
    "ok"
}

/// Every page load refetches both lists, then renders the full page.
async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    if let Err(e) = state.controller.bootstrap().await {
        log::warn!("[serve] page load with stale data: {}", e);
    }
    Html(state.controller.with_state(page::render))
}

async fn frame(State(state): State<Arc<AppState>>) -> Json<Screen> {
    Json(state.current_screen())
}

async fn action(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Screen>, AppError> {
    let payload: ActionPayload = if body.iter().all(u8::is_ascii_whitespace) {
        ActionPayload::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?
    };
    let action = UiAction::from_parts(&name, payload)?;

    match state.controller.dispatch(action).await {
        Ok(()) => Ok(Json(state.current_screen())),
        Err(e) => Err(AppError::Upstream {
            message: e.to_string(),
            screen: state.current_screen(),
        }),
    }
}
