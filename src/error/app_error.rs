use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,
    /// Non-401 API failure with the most specific message the response
    /// payload offered (server `error` field, else the raw payload).
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Network error. Please check your connection.")]
    Network {
        #[source]
        source: reqwest::Error,
    },
    /// Blocking form-level validation failure; never reaches the network.
    #[error("{0}")]
    Form(String),
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal storage error")]
    Storage { message: String },
    #[error("Internal configuration error")]
    ConfigurationError {
        message: String,
        #[source]
        source: figment::Error,
    },
}

impl AppError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn form(message: impl Into<String>) -> Self {
        Self::Form(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn storage_io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            message: format!("{}: {}", message.into(), source),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Network { source: e }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::storage(format!("Failed to serialize session state: {e}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::storage_io("Storage I/O failed", e)
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::ConfigurationError {
            message: "Failed to read configuration".to_string(),
            source: e,
        }
    }
}
