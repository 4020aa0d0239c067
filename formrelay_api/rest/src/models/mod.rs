use serde::Serialize;

/// Body of every successful response: `{"success":true,"message":...}`.
#[derive(Debug, Serialize)]
pub struct ApiSuccess {
    pub success: bool,
    pub message: &'static str,
}

impl ApiSuccess {
    pub fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

/// Body of every failed response: `{"success":false,"error":...}`.
#[derive(Debug, Serialize)]
pub struct ApiFailure {
    pub success: bool,
    pub error: String,
}

impl ApiFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
