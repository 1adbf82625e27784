//! Error types for container parsing and resource loading
//!
//! Problems with document *content* never surface as errors: they are
//! recorded as [`ValidationMessage`](crate::ValidationMessage)s and the run
//! continues. The types here cover the two places where a failure is a
//! value in its own right:
//!
//! - [`ContainerError`]: the input could not be turned into a JSON document
//!   at all. Each variant maps to exactly one message code, and the run ends
//!   with that single message.
//! - [`LoadError`]: an injected [`ResourceLoader`](crate::ResourceLoader)
//!   could not produce the bytes for an external URI.
//!
//! Display strings carry the message code in brackets, e.g.
//! `[GLB_INVALID_MAGIC] Invalid GLB magic value (0x...)`.

use crate::issues::IssueCode;
use std::io;
use thiserror::Error;

/// Result type for container parsing
pub type Result<T> = std::result::Result<T, ContainerError>;

/// Fatal failures while un-framing the input into a JSON document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// Input is shorter than the 12-byte GLB header
    ///
    /// **Code**: `GLB_UNEXPECTED_END_OF_HEADER`
    #[error("[GLB_UNEXPECTED_END_OF_HEADER] Unexpected end of header: {available} of 12 bytes present")]
    UnexpectedEndOfHeader {
        /// Number of bytes actually present
        available: usize,
    },

    /// First four bytes are not `glTF`
    ///
    /// **Code**: `GLB_INVALID_MAGIC`
    #[error("[GLB_INVALID_MAGIC] Invalid GLB magic value (0x{0:08X})")]
    InvalidMagic(u32),

    /// Header version is not 2
    ///
    /// **Code**: `GLB_INVALID_VERSION`
    #[error("[GLB_INVALID_VERSION] Invalid GLB version value {0}")]
    InvalidVersion(u32),

    /// Header `length` disagrees with the number of bytes supplied
    ///
    /// **Code**: `GLB_LENGTH_MISMATCH`
    #[error("[GLB_LENGTH_MISMATCH] Declared length ({declared}) does not match GLB length ({actual})")]
    LengthMismatch {
        /// Length from the GLB header
        declared: u64,
        /// Actual byte count
        actual: u64,
    },

    /// First chunk is not a JSON chunk
    ///
    /// **Code**: `GLB_UNEXPECTED_FIRST_CHUNK`
    #[error("[GLB_UNEXPECTED_FIRST_CHUNK] First chunk must be of JSON type. Found 0x{0:08X} instead")]
    UnexpectedFirstChunk(u32),

    /// Fewer than 8 bytes remain where a chunk header is expected
    ///
    /// **Code**: `GLB_UNEXPECTED_END_OF_CHUNK_HEADER`
    #[error("[GLB_UNEXPECTED_END_OF_CHUNK_HEADER] Unexpected end of chunk header at offset {0}")]
    UnexpectedEndOfChunkHeader(usize),

    /// Chunk payload runs past the end of the input
    ///
    /// **Code**: `GLB_UNEXPECTED_END_OF_CHUNK_DATA`
    #[error("[GLB_UNEXPECTED_END_OF_CHUNK_DATA] Chunk at offset {offset} declares {length} bytes, only {available} available")]
    UnexpectedEndOfChunkData {
        /// Offset of the chunk header
        offset: usize,
        /// Declared payload length
        length: usize,
        /// Bytes remaining after the header
        available: usize,
    },

    /// JSON text is not valid UTF-8
    ///
    /// **Code**: `INVALID_UTF8`
    #[error("[INVALID_UTF8] Invalid UTF-8 sequence at byte {0}")]
    InvalidUtf8(usize),

    /// JSON text does not parse
    ///
    /// **Code**: `INVALID_JSON`
    #[error("[INVALID_JSON] Invalid JSON data. Parser output: {0}")]
    InvalidJson(String),

    /// JSON parses, but the root value is not an object
    ///
    /// **Code**: `INVALID_JSON_ROOT_OBJECT`
    #[error("[INVALID_JSON_ROOT_OBJECT] JSON root is not an object")]
    InvalidRootObject,
}

impl ContainerError {
    /// The message code this failure is reported under
    pub fn code(&self) -> IssueCode {
        match self {
            ContainerError::UnexpectedEndOfHeader { .. } => IssueCode::GlbUnexpectedEndOfHeader,
            ContainerError::InvalidMagic(_) => IssueCode::GlbInvalidMagic,
            ContainerError::InvalidVersion(_) => IssueCode::GlbInvalidVersion,
            ContainerError::LengthMismatch { .. } => IssueCode::GlbLengthMismatch,
            ContainerError::UnexpectedFirstChunk(_) => IssueCode::GlbUnexpectedFirstChunk,
            ContainerError::UnexpectedEndOfChunkHeader(_) => {
                IssueCode::GlbUnexpectedEndOfChunkHeader
            }
            ContainerError::UnexpectedEndOfChunkData { .. } => {
                IssueCode::GlbUnexpectedEndOfChunkData
            }
            ContainerError::InvalidUtf8(_) => IssueCode::InvalidUtf8,
            ContainerError::InvalidJson(_) => IssueCode::InvalidJson,
            ContainerError::InvalidRootObject => IssueCode::InvalidJsonRootObject,
        }
    }

    /// Message text without the bracketed code prefix
    pub fn description(&self) -> String {
        let text = self.to_string();
        match text.split_once("] ") {
            Some((_, rest)) => rest.to_string(),
            None => text,
        }
    }
}

impl From<serde_json::Error> for ContainerError {
    fn from(err: serde_json::Error) -> Self {
        ContainerError::InvalidJson(err.to_string())
    }
}

impl From<std::str::Utf8Error> for ContainerError {
    fn from(err: std::str::Utf8Error) -> Self {
        ContainerError::InvalidUtf8(err.valid_up_to())
    }
}

/// Failure reported by a [`ResourceLoader`](crate::ResourceLoader)
#[derive(Error, Debug)]
pub enum LoadError {
    /// No resource exists at the given URI
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// I/O failure while reading the resource
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Any other loader-specific failure
    #[error("{0}")]
    Other(String),
}
