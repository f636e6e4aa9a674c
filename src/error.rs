//! Error types for zipedit

use std::io;

use thiserror::Error;

/// Result type for zipedit operations
pub type Result<T> = std::result::Result<T, ZipError>;

/// Error types that can occur while reading, editing, or writing archives
#[derive(Debug, Error)]
pub enum ZipError {
    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Malformed container: wrong signature, truncated data, inconsistent
    /// CRCs, unknown version
    #[error("bad archive: {0}")]
    BadFile(String),
    /// The archive uses a compression method id reserved by PKWARE
    #[error("compression method {0} is reserved")]
    ReservedValue(u16),
    /// The archive uses a compression method id PKZIP no longer supports
    #[error("compression method {0} is deprecated")]
    Deprecated(u16),
    /// The archive uses a compression method id this library does not know
    #[error("unknown compression method: {0}")]
    UnknownMethod(u16),
    /// The archive requests a feature or codec that is not bundled
    #[error("{0} is not supported")]
    NotImplemented(String),
    /// ZipCrypto header check failed
    #[error("incorrect password")]
    WrongPassword,
    /// An editable operation referenced a path absent from the staged table,
    /// or a filesystem source that does not exist
    #[error("file not found: {0}")]
    FileNotFound(String),
    /// Caller-supplied archive path contains forbidden characters
    #[error("illegal path: {0}")]
    IllegalPath(String),
    /// Text cannot be represented in the selected character encoding
    #[error("text is not representable in {0}")]
    Encoding(&'static str),
}
