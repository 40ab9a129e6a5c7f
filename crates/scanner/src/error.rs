use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid hunk header at line {line}: {header:?}")]
    InvalidHunkHeader { line: usize, header: String },

    #[error("Invalid repository path: {0}")]
    InvalidPath(String),

    #[error("Reference error: {0}")]
    ReferenceError(#[from] flagrefs_references::ReferenceError),
}
