//! Upward events
//!
//! One event at most is produced per controller pump call. The call
//! reference inside call-shaped events doubles as the opaque call handle
//! for the upper-layer operations (`acknowledge`, `answer`, `hangup`, ...).

use std::fmt;

use crate::bearer::TransferCap;
use crate::cref::CallRef;

/// Payload of a `Ring` (incoming SETUP) event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingEvent {
    /// Channel requested, if any
    pub channel: Option<u8>,
    /// Presentation/screening of the caller id
    pub calling_pres: Option<u8>,
    /// Dialing plan of the calling entity
    pub calling_plan: Option<u8>,
    /// Calling number
    pub calling: String,
    /// Dialing plan of the called number
    pub called_plan: Option<u8>,
    /// Called number
    pub called: String,
    /// True when the peer left channel selection preferred rather than
    /// exclusive
    pub flexible: bool,
    /// Call reference; the opaque call handle
    pub cref: CallRef,
    /// Requested transfer capability
    pub capability: Option<TransferCap>,
}

/// Events delivered to the embedding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriEvent {
    /// Data link is up
    DchanUp,

    /// Data link is down
    DchanDown,

    /// Configuration error detected (role collision on SABME)
    ConfigError { err: String },

    /// Peer restarted a bearer channel
    Restart { channel: Option<u8> },

    /// Incoming call
    Ring(RingEvent),

    /// Call got hung up
    Hangup {
        channel: Option<u8>,
        cause: Option<u8>,
        cref: CallRef,
    },

    /// Outbound call is alerting at the far end
    Ringing { channel: Option<u8>, cref: CallRef },

    /// Outbound call has been answered
    Answer { channel: Option<u8>, cref: CallRef },
}

impl PriEvent {
    /// Short event name.
    pub fn name(&self) -> &'static str {
        match self {
            PriEvent::DchanUp => "D-channel up",
            PriEvent::DchanDown => "D-channel down",
            PriEvent::ConfigError { .. } => "Configuration error",
            PriEvent::Restart { .. } => "Restart channel",
            PriEvent::Ring(_) => "Ring",
            PriEvent::Hangup { .. } => "Hangup",
            PriEvent::Ringing { .. } => "Ringing",
            PriEvent::Answer { .. } => "Answer",
        }
    }

    /// Call reference for call-shaped events.
    pub fn cref(&self) -> Option<CallRef> {
        match self {
            PriEvent::Ring(r) => Some(r.cref),
            PriEvent::Hangup { cref, .. }
            | PriEvent::Ringing { cref, .. }
            | PriEvent::Answer { cref, .. } => Some(*cref),
            _ => None,
        }
    }
}

impl fmt::Display for PriEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriEvent::ConfigError { err } => write!(f, "{}: {}", self.name(), err),
            PriEvent::Restart { channel } => {
                write!(f, "{} on channel {:?}", self.name(), channel)
            }
            PriEvent::Ring(r) => write!(
                f,
                "{}: {} -> {} on channel {:?} cref {}",
                self.name(),
                r.calling,
                r.called,
                r.channel,
                r.cref
            ),
            PriEvent::Hangup { cause, cref, .. } => {
                write!(f, "{}: cref {} cause {:?}", self.name(), cref, cause)
            }
            _ => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(PriEvent::DchanUp.name(), "D-channel up");
        assert_eq!(
            PriEvent::Restart { channel: Some(3) }.name(),
            "Restart channel"
        );
    }

    #[test]
    fn test_cref_accessor() {
        let cref = CallRef::new_peer(7);
        let ev = PriEvent::Hangup { channel: None, cause: Some(16), cref };
        assert_eq!(ev.cref(), Some(cref));
        assert_eq!(PriEvent::DchanUp.cref(), None);
    }
}
