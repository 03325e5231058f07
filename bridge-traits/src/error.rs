use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// Structured rejection returned by the native module (code + message).
    #[error("Native call rejected [{code}]: {message}")]
    Rejected { code: String, message: String },

    #[error("Malformed native payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl BridgeError {
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
