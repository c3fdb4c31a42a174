//! Error types for placegraph-core

use std::fmt;
use thiserror::Error;

use crate::domain::{FolderId, PlaceId};

/// Error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input bytes are not well-formed XML
    MalformedDocument,
    /// Well-formed XML without the expected kml/Document structure
    UnrecognizedFormat,
    /// Folder lookup with an unknown or stale identity
    FolderNotFound,
    /// Place lookup with an unknown or stale identity
    PlaceNotFound,
    /// I/O errors (file-based ingestion only)
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedDocument => "malformed_document",
            ErrorKind::UnrecognizedFormat => "unrecognized_format",
            ErrorKind::FolderNotFound => "folder_not_found",
            ErrorKind::PlaceNotFound => "place_not_found",
            ErrorKind::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for ingestion and store operations
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct Error {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn malformed_document(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedDocument, message)
    }

    pub fn unrecognized_format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnrecognizedFormat, message)
    }

    pub fn folder_not_found(id: FolderId) -> Self {
        Self::new(
            ErrorKind::FolderNotFound,
            format!("Folder not found: {}", id.0),
        )
    }

    pub fn place_not_found(id: PlaceId) -> Self {
        Self::new(
            ErrorKind::PlaceNotFound,
            format!("Place not found: {}", id.0),
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorKind::Io, format!("I/O error: {}", err)).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
