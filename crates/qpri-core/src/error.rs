//! Error types for the PRI stack

use std::fmt;

/// Result type for stack operations
pub type PriResult<T> = Result<T, PriError>;

/// Errors that can occur in stack operations.
///
/// Propagation is local by design: a bad IE fails its own decode, a bad
/// message is dropped, a bad frame is dropped. Only the SABME role
/// collision ever surfaces to the embedding application as an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriError {
    /// Malformed inbound data; the offending frame or message is dropped
    Protocol(ProtocolError),

    /// A write to the D-channel failed (negative errno kept for diagnosis)
    Transmit(i32),

    /// A write transferred fewer bytes than one frame
    ShortWrite { wrote: usize, len: usize },

    /// A read from the D-channel failed
    Receive(i32),

    /// Scheduler slot table is at its hard bound
    SchedFull,

    /// Operation referenced a call the directory does not know
    UnknownCall,

    /// Outbound SETUP without a channel specification
    NoChannel,

    /// Outbound SETUP without a called number
    NoCalledNumber,

    /// Operation requires an established data link
    LinkDown,
}

/// Inbound protocol violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame too short for its type
    ShortFrame,

    /// Bad EA bits, broadcast TEI or foreign SAPI
    BadAddress,

    /// Call reference length field out of range
    BadCallRef,

    /// Protocol discriminator we do not terminate
    BadDiscriminator(u8),

    /// Message type octet without a handler
    UnknownMessage(u8),

    /// Declared IE extent runs past the end of the message
    IeOverrun,

    /// An IE decoder rejected its content
    BadIe(u8),
}

impl fmt::Display for PriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriError::Protocol(e) => write!(f, "protocol error: {}", e),
            PriError::Transmit(errno) => write!(f, "D-channel write failed (errno {})", errno),
            PriError::ShortWrite { wrote, len } => {
                write!(f, "short write: {}/{}", wrote, len)
            }
            PriError::Receive(errno) => write!(f, "D-channel read failed (errno {})", errno),
            PriError::SchedFull => write!(f, "no more room in scheduler"),
            PriError::UnknownCall => write!(f, "unknown call reference"),
            PriError::NoChannel => write!(f, "no channel specified"),
            PriError::NoCalledNumber => write!(f, "no called number specified"),
            PriError::LinkDown => write!(f, "data link not established"),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::ShortFrame => write!(f, "short frame"),
            ProtocolError::BadAddress => write!(f, "bad layer 2 address"),
            ProtocolError::BadCallRef => write!(f, "bad call reference"),
            ProtocolError::BadDiscriminator(pd) => {
                write!(f, "unhandled protocol discriminator {:#04x}", pd)
            }
            ProtocolError::UnknownMessage(m) => write!(f, "unknown message type {:#04x}", m),
            ProtocolError::IeOverrun => write!(f, "message longer than it should be"),
            ProtocolError::BadIe(id) => write!(f, "invalid content in IE {:#04x}", id),
        }
    }
}

impl std::error::Error for PriError {}

impl From<ProtocolError> for PriError {
    fn from(e: ProtocolError) -> Self {
        PriError::Protocol(e)
    }
}
