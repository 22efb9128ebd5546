use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid GitHub repository URL")]
    InvalidRepoUrl,

    #[error("Scraping error: {0}")]
    Scrape(String),

    #[error("Analysis error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidRepoUrl => StatusCode::BAD_REQUEST,
            AppError::Scrape(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<fantoccini::error::NewSessionError> for AppError {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        AppError::Scrape(err.to_string())
    }
}

impl From<fantoccini::error::CmdError> for AppError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        AppError::Scrape(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Llm(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
