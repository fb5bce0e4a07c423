//! Unified error types for the smart lamp firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! node runtimes' error handling uniform.  All variants are `Copy` so they
//! can be carried inside call outcomes and application events without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Talking to a peer node failed.
    Comms(CommsError),
    /// A request or response could not be understood.
    Protocol(ProtocolError),
    /// Peripheral or socket initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Communication errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The peer did not answer before the call deadline.
    Timeout,
    /// The datagram could not be sent.
    SendFailed,
    /// The socket failed while waiting for the answer.
    ReceiveFailed,
    /// The encoded request did not fit the datagram buffer.
    RequestTooLarge,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::SendFailed => write!(f, "send failed"),
            Self::ReceiveFailed => write!(f, "receive failed"),
            Self::RequestTooLarge => write!(f, "request too large"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Protocol errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Header line missing or not valid UTF-8.
    MalformedFrame,
    /// Method token is not one the resources understand.
    UnknownMethod,
    /// Response code token is not recognised.
    UnknownCode,
    /// A field exceeded its fixed-capacity buffer.
    FieldTooLong,
    /// Payload is not a decimal integer.
    NotNumeric,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedFrame => write!(f, "malformed frame"),
            Self::UnknownMethod => write!(f, "unknown method"),
            Self::UnknownCode => write!(f, "unknown response code"),
            Self::FieldTooLong => write!(f, "field exceeds buffer capacity"),
            Self::NotNumeric => write!(f, "payload is not numeric"),
        }
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}
