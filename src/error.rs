//! Unified error type for store and handler operations.

/// Things that can go wrong while serving a request.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backing file could not be read (missing, permissions, not UTF-8).
    StoreUnreadable(String),
    /// Backing file does not hold a JSON array of objects.
    StoreCorrupt(String),
    /// Backing file could not be written (write or rename failed).
    StoreUnwritable(String),
    /// Request body is not a JSON object.
    BadRequest(String),
    /// No record carries the requested id.
    NotFound,
}

impl Error {
    /// `true` for failures that come from the backing file rather than the
    /// request itself.
    #[must_use]
    pub fn is_store(&self) -> bool {
        matches!(
            self,
            Error::StoreUnreadable(_) | Error::StoreCorrupt(_) | Error::StoreUnwritable(_)
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::StoreUnreadable(msg) => write!(f, "store unreadable: {msg}"),
            Error::StoreCorrupt(msg) => write!(f, "store corrupt: {msg}"),
            Error::StoreUnwritable(msg) => write!(f, "store unwritable: {msg}"),
            Error::BadRequest(msg) => write!(f, "bad request: {msg}"),
            Error::NotFound => write!(f, "id not found"),
        }
    }
}

impl std::error::Error for Error {}

// Plain I/O errors only surface on the write path; reads map their own
// failures to `StoreUnreadable` in `persist::read_bytes`.
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::StoreUnwritable(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::StoreUnreadable(err.to_string())
        } else {
            Error::StoreCorrupt(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
