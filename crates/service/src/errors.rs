use std::{fmt, io};

use thiserror::Error;

/// Byte store operation that produced a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Exists,
    List,
    Read,
    Write,
    Create,
    Delete,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StoreOp::Exists => "exists",
            StoreOp::List => "list",
            StoreOp::Read => "read",
            StoreOp::Write => "write",
            StoreOp::Create => "create",
            StoreOp::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// Failure of a single byte store call, with the underlying I/O error chained.
#[derive(Debug, Error)]
#[error("{op} '{name}' failed: {source}")]
pub struct StoreError {
    pub op: StoreOp,
    pub name: String,
    #[source]
    pub source: io::Error,
}

impl StoreError {
    pub fn new(op: StoreOp, name: impl Into<String>, source: io::Error) -> Self {
        Self { op, name: name.into(), source }
    }

    /// Name rejected before touching the backing storage.
    pub fn invalid_name(op: StoreOp, name: impl Into<String>) -> Self {
        Self::new(
            op,
            name,
            io::Error::new(io::ErrorKind::InvalidInput, "name must stay inside the store namespace"),
        )
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("already exists: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("content is not valid JSON: {0}")]
    UnsupportedContent(#[source] serde_json::Error),
    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    pub fn not_found(name: &str) -> Self { Self::NotFound(name.to_string()) }
    pub fn conflict(name: &str) -> Self { Self::Conflict(name.to_string()) }
}

/// Store errors that mean "the precondition changed under us" become the
/// matching domain error; everything else stays a store failure.
impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => ServiceError::NotFound(e.name),
            io::ErrorKind::AlreadyExists => ServiceError::Conflict(e.name),
            io::ErrorKind::InvalidInput => ServiceError::InvalidName(e.name),
            _ => ServiceError::Store(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn store_error_keeps_cause_chained() {
        let err = StoreError::new(
            StoreOp::Write,
            "a.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "read-only filesystem"),
        );
        assert_eq!(err.to_string(), "write 'a.txt' failed: read-only filesystem");
        let svc: ServiceError = err.into();
        assert!(matches!(svc, ServiceError::Store(_)));
        let source = svc.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("read-only filesystem"));
    }

    #[test]
    fn store_error_kinds_map_to_domain_errors() {
        let nf: ServiceError = StoreError::new(StoreOp::Read, "x", io::ErrorKind::NotFound.into()).into();
        assert!(matches!(nf, ServiceError::NotFound(ref n) if n == "x"));

        let dup: ServiceError = StoreError::new(StoreOp::Create, "x", io::ErrorKind::AlreadyExists.into()).into();
        assert!(matches!(dup, ServiceError::Conflict(_)));

        let bad: ServiceError = StoreError::invalid_name(StoreOp::Read, "../x").into();
        assert!(matches!(bad, ServiceError::InvalidName(ref n) if n == "../x"));
    }
}
