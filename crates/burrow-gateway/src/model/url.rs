use serde::{Deserialize, Serialize};

pub const STATUS_OK: &str = "OK";
pub const STATUS_ERROR: &str = "Error";

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub url: String,
    #[serde(default)]
    pub alias: String,
}

#[derive(Debug, Serialize)]
pub struct CreateUrlResponse {
    pub status: &'static str,
    pub alias: String,
    pub short_url: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: STATUS_OK }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            error: error.into(),
        }
    }
}
