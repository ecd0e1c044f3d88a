use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("Unknown model_key: {0}")]
    UnknownModel(String),
    #[error("Inference failed: {0}")]
    Inference(String),
    #[error("Operation failed: {0}")]
    OperationFailed(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("{0}")]
    BadGateway(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<image::ImageError> for DomainError {
    fn from(err: image::ImageError) -> Self {
        DomainError::OperationFailed(format!("image error: {err}"))
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::OperationFailed(format!("io error: {err}"))
    }
}
