pub mod accounts;
pub mod files;
pub mod generate;
pub mod tasks;

use serde::Serialize;

/// `{"success", "message"}` body shared by the account and task endpoints.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}
