use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: &str) -> Self {
        Message {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorMessage {
    pub error: String,
}

impl ErrorMessage {
    pub fn new(error: &str) -> Self {
        ErrorMessage {
            error: error.to_string(),
        }
    }
}
