use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Service initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Delegate error: {0}")]
    Delegate(#[from] core_delegate::DelegateError),

    #[error("Capability error: {0}")]
    Capability(#[from] core_capabilities::CapabilityError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
