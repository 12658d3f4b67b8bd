use async_graphql::ErrorExtensions;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] surrealdb::Error),

    #[error("Unexpected store result: {0}")]
    StoreResult(String),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Environment error: {0}")]
    EnvError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Machine-readable code attached to GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Store(_) | AppError::StoreResult(_) => "STORE_ERROR",
            AppError::Pool(_) => "STORE_UNAVAILABLE",
            AppError::Network(_) | AppError::HttpStatus { .. } => "TRANSPORT_ERROR",
            AppError::GraphQl(_) => "GRAPHQL_ERROR",
            AppError::InvalidEndpoint(_) | AppError::EnvError(_) => "CONFIGURATION_ERROR",
            AppError::JsonError(_) | AppError::IoError(_) => "INTERNAL_ERROR",
            AppError::AuthError(_) => "UNAUTHORIZED",
            AppError::NotFound(_) => "NOT_FOUND",
        }
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
