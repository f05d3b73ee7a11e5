//! Error model shared by the codec and the transport.
//!
//! Mirrors the taxonomy of kinds the core is specified to surface: callers
//! match on [`Kind`], not on the wrapped source error.

use std::fmt;

use thiserror::Error;

/// The kind of failure a core operation reports. `Ok` itself is represented
/// as `Result::Ok` and has no member here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Caller violated a precondition (null pointer, non-zero destination on
    /// read, length out of range).
    InvalidParameters,
    /// The operation is well-formed but the current cumulative state
    /// disallows it (e.g. nesting cap reached).
    InvalidState,
    /// Allocation failure. The partially built value is always cleared
    /// before the error is returned.
    OutOfMemory,
    /// Wire bytes do not form a valid message (bad tag, bad length, matrix
    /// dimension product mismatch, ...).
    EncodingError,
    /// Non-blocking I/O could not complete; retry later.
    WouldBlock,
    /// Peer closed the connection cleanly.
    Closed,
    /// Unknown failure, not covered by a more specific kind.
    NotOk,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::InvalidParameters => "invalid-parameters",
            Kind::InvalidState => "invalid-state",
            Kind::OutOfMemory => "out-of-memory",
            Kind::EncodingError => "encoding-error",
            Kind::WouldBlock => "would-block",
            Kind::Closed => "closed",
            Kind::NotOk => "not-ok",
        };
        f.write_str(s)
    }
}

/// Error type threaded through every codec and transport operation.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: Kind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Build an error of the given kind with a human-readable message.
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach an underlying cause.
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::new(Kind::InvalidParameters, message)
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(Kind::InvalidState, message)
    }

    pub fn out_of_memory(message: impl Into<String>) -> Self {
        Self::new(Kind::OutOfMemory, message)
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(Kind::EncodingError, message)
    }

    pub fn would_block() -> Self {
        Self::new(Kind::WouldBlock, "operation would block")
    }

    pub fn closed() -> Self {
        Self::new(Kind::Closed, "peer closed the connection")
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Map this error to the standard OPC UA TCP error code, per the
    /// encoding-layer overflow / misuse mapping table. Values not covered by
    /// the table pass through as `BadTcpInternalError`.
    pub fn to_tcp_status_code(&self) -> u32 {
        match self.kind {
            Kind::OutOfMemory => status::BAD_TCP_NOT_ENOUGH_RESOURCES,
            Kind::EncodingError => status::BAD_TCP_MESSAGE_TYPE_INVALID,
            Kind::InvalidState | Kind::InvalidParameters | Kind::NotOk => {
                status::BAD_TCP_INTERNAL_ERROR
            }
            Kind::WouldBlock | Kind::Closed => status::BAD_TCP_INTERNAL_ERROR,
        }
    }
}

/// Standard TCP-layer status codes named in the error mapping table.
pub mod status {
    pub const BAD_TCP_MESSAGE_TOO_LARGE: u32 = 0x8075_0000;
    pub const BAD_TCP_MESSAGE_TYPE_INVALID: u32 = 0x8073_0000;
    pub const BAD_TCP_NOT_ENOUGH_RESOURCES: u32 = 0x8074_0000;
    pub const BAD_TCP_INTERNAL_ERROR: u32 = 0x8076_0000;
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        use std::io::ErrorKind as K;
        let kind = match value.kind() {
            K::WouldBlock => Kind::WouldBlock,
            K::UnexpectedEof | K::ConnectionReset | K::ConnectionAborted => Kind::Closed,
            _ => Kind::NotOk,
        };
        Error::new(kind, value.to_string()).with_source(value)
    }
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        let io_kind = match value.kind {
            Kind::WouldBlock => std::io::ErrorKind::WouldBlock,
            Kind::Closed => std::io::ErrorKind::UnexpectedEof,
            _ => std::io::ErrorKind::Other,
        };
        std::io::Error::new(io_kind, value)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
