use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("reference must not be empty")]
    EmptyReference,
}

pub type Result<T> = std::result::Result<T, ModelError>;
