use thiserror::Error;

#[derive(Error, Debug)]
pub enum HasherError {
    #[error("password is empty or field not present")]
    EmptyInput,

    #[error("invalid id format: {0}")]
    InvalidIdFormat(String),

    #[error("id must be greater than 0, got {0}")]
    IdNotPositive(i64),

    #[error("id {id} out of range, {jobs} jobs exist")]
    IdOutOfRange { id: u64, jobs: u64 },

    #[error("server is draining, not accepting new work")]
    ShuttingDown,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HasherError {
    /// Client errors are the caller's fault and never affect shared state.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HasherError::EmptyInput
                | HasherError::InvalidIdFormat(_)
                | HasherError::IdNotPositive(_)
                | HasherError::IdOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, HasherError>;
