use flagrefs_protocol::Operation;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReferenceError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReferenceError {
    /// Only additions and deletions carry flag references
    #[error("invalid operation={0} for flag {1}")]
    InvalidOperation(Operation, String),
}
