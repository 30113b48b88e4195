#[derive(Debug)]
pub enum ApiError {
    /// Connection refused, timeout, or any other transport failure.
    Network(String),
    /// HTTP 404 for the given path.
    NotFound(String),
    /// Any other non-2xx response.
    Server { status: u16, message: String },
    /// The body was not the JSON shape we expected.
    Decode(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(e) => write!(f, "network: {}", e),
            Self::NotFound(path) => write!(f, "not found: {}", path),
            Self::Server { status, message } if message.is_empty() => {
                write!(f, "server returned {}", status)
            }
            Self::Server { status, message } => write!(f, "server returned {}: {}", status, message),
            Self::Decode(e) => write!(f, "decode: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
