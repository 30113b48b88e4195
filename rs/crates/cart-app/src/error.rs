use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cart_core::{ActionError, Screen};

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// The backend call failed; the repainted screen carries the notice.
    Upstream { message: String, screen: Screen },
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(e) => write!(f, "bad request: {}", e),
            Self::Upstream { message, .. } => write!(f, "upstream: {}", message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(e) => (StatusCode::BAD_REQUEST, serde_json::json!({ "error": e })),
            Self::Upstream { message, screen } => (
                StatusCode::BAD_GATEWAY,
                serde_json::json!({ "error": message, "screen": screen }),
            ),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<ActionError> for AppError {
    fn from(e: ActionError) -> Self {
        Self::BadRequest(e.to_string())
    }
}
