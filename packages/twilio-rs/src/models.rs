use serde::Deserialize;

/// Subset of the Message resource returned by `POST /Messages.json`
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub sid: String,
    pub status: String,
    pub to: Option<String>,
    pub from: Option<String>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}

/// Error body Twilio returns on 4xx/5xx
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub code: Option<i64>,
    pub message: String,
    pub more_info: Option<String>,
    pub status: Option<u16>,
}
