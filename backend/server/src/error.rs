use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bowl::CatalogError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Unknown menu: {0}")]
    UnknownMenu(String),

    #[error("Invalid portion: {0}")]
    InvalidPortion(f64),

    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload | AppError::InvalidPortion(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownMenu(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(error: CatalogError) -> Self {
        AppError::InternalError(Box::new(error))
    }
}

/// Failures before the server is accepting requests. None of these are recoverable.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Environment misconfigured: {0}")]
    Config(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to fetch catalog: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("Failed to bind: {0}")]
    Io(#[from] std::io::Error),
}
