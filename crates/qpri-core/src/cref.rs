//! Call reference identifier
//!
//! Q.931 identifies a call on the D-channel by a 15-bit reference plus a
//! flag bit that tells the two ends apart. Internally we keep the absolute
//! value and a `local` origin marker; the flag bit only exists at the wire
//! boundary.
//!
//! Wire rule: a message sent by the side that allocated the reference
//! carries flag 0; the answering side carries flag 1.

use std::fmt;

/// A call reference: 15-bit value in [0, 32767] plus origin.
///
/// `local` is true when this end allocated the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallRef {
    value: u16,
    local: bool,
}

impl CallRef {
    /// The global call reference (value 0), used by RESTART on our side.
    pub const GLOBAL: CallRef = CallRef { value: 0, local: true };

    /// A reference allocated by this end.
    pub fn new_local(value: u16) -> Self {
        debug_assert!(value <= 0x7fff);
        CallRef { value: value & 0x7fff, local: true }
    }

    /// A reference assigned by the peer.
    pub fn new_peer(value: u16) -> Self {
        debug_assert!(value <= 0x7fff);
        CallRef { value: value & 0x7fff, local: false }
    }

    #[inline]
    pub fn value(self) -> u16 {
        self.value
    }

    #[inline]
    pub fn is_local(self) -> bool {
        self.local
    }

    /// 16-bit value for an outgoing message: flag 0 when we originated the
    /// call, 1 when we are answering the peer's reference.
    #[inline]
    pub fn wire_tx(self) -> u16 {
        if self.local {
            self.value
        } else {
            self.value | 0x8000
        }
    }

    /// Decode the 16-bit value of a received message. Flag 1 means the
    /// sender is the answering side, so the reference is one of ours.
    #[inline]
    pub fn from_wire_rx(raw: u16) -> Self {
        CallRef {
            value: raw & 0x7fff,
            local: raw & 0x8000 != 0,
        }
    }
}

impl Default for CallRef {
    /// The global call reference.
    fn default() -> Self {
        CallRef::GLOBAL
    }
}

impl fmt::Display for CallRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, if self.local { "local" } else { "peer" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip() {
        // A reference we allocated goes out with flag 0; the peer's answer
        // comes back with flag 1 and must resolve to the same CallRef.
        let ours = CallRef::new_local(42);
        assert_eq!(ours.wire_tx(), 42);
        let answered = CallRef::from_wire_rx(42 | 0x8000);
        assert_eq!(answered, ours);
    }

    #[test]
    fn test_peer_round_trip() {
        // A peer-originated SETUP arrives with flag 0; our answers carry
        // flag 1.
        let theirs = CallRef::from_wire_rx(0x0001);
        assert_eq!(theirs, CallRef::new_peer(1));
        assert_eq!(theirs.wire_tx(), 0x8001);
    }

    #[test]
    fn test_global() {
        assert_eq!(CallRef::GLOBAL.value(), 0);
        assert_eq!(CallRef::GLOBAL.wire_tx(), 0);
    }

    #[test]
    fn test_distinct_sides() {
        // Value 1 allocated by each side refers to two different calls.
        assert_ne!(CallRef::new_local(1), CallRef::new_peer(1));
    }
}
