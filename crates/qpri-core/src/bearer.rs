//! Bearer capability code points
//!
//! Typed transfer capability and mode/rate, plus the raw user-layer
//! protocol codes the bearer capability IE can carry.

use crate::dialect::Dialect;

/// Information transfer capability (5-bit field of bearer octet 3).
///
/// The 4ESS dialect uses 0x08 for 3.1 kHz audio, which collides with the
/// standard code for unrestricted digital. The mapping applies in both
/// directions and is lossy by nature; under 4ESS a digital bearer cannot
/// be distinguished from audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferCap {
    Speech,
    /// Unrestricted digital information
    Digital,
    /// 3.1 kHz audio
    Audio31k,
}

const CAP_SPEECH: u8 = 0x00;
const CAP_DIGITAL: u8 = 0x08;
const CAP_AUDIO_31K: u8 = 0x10;
const CAP_AUDIO_4ESS: u8 = 0x08;

impl TransferCap {
    pub fn code(self, dialect: Dialect) -> u8 {
        match self {
            TransferCap::Speech => CAP_SPEECH,
            TransferCap::Digital => CAP_DIGITAL,
            TransferCap::Audio31k => {
                if dialect == Dialect::Att4ess {
                    CAP_AUDIO_4ESS
                } else {
                    CAP_AUDIO_31K
                }
            }
        }
    }

    pub fn from_code(code: u8, dialect: Dialect) -> Option<TransferCap> {
        match code {
            CAP_SPEECH => Some(TransferCap::Speech),
            CAP_DIGITAL => {
                if dialect == Dialect::Att4ess {
                    Some(TransferCap::Audio31k)
                } else {
                    Some(TransferCap::Digital)
                }
            }
            CAP_AUDIO_31K => Some(TransferCap::Audio31k),
            _ => None,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            TransferCap::Speech => "Speech",
            TransferCap::Digital => "Unrestricted digital information",
            TransferCap::Audio31k => "3.1 kHz audio",
        }
    }
}

/// Information transfer mode and rate (7-bit field of bearer octet 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// 64 kbps, circuit mode; the only mode the call engine accepts on an
    /// incoming SETUP
    Circuit64,
    Circuit384,
    Circuit1536,
    /// N x 64 kbps; carries a multiplier octet
    Multirate,
    Packet,
}

impl TransferMode {
    pub fn code(self) -> u8 {
        match self {
            TransferMode::Circuit64 => 0x10,
            TransferMode::Circuit384 => 0x13,
            TransferMode::Circuit1536 => 0x15,
            TransferMode::Multirate => 0x18,
            TransferMode::Packet => 0x40,
        }
    }

    pub fn from_code(code: u8) -> Option<TransferMode> {
        match code {
            0x10 => Some(TransferMode::Circuit64),
            0x13 => Some(TransferMode::Circuit384),
            0x15 => Some(TransferMode::Circuit1536),
            0x18 => Some(TransferMode::Multirate),
            0x40 => Some(TransferMode::Packet),
            _ => None,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            TransferMode::Circuit64 => "64 kbps, circuit mode",
            TransferMode::Circuit384 => "384 kbps, circuit mode",
            TransferMode::Circuit1536 => "1536 kbps, circuit mode",
            TransferMode::Multirate => "Multirate (Nx64 kbps)",
            TransferMode::Packet => "Packet mode",
        }
    }
}

// ── User information layer protocol codes ─────────────────────────

pub const LAYER1_RATE_ADAPT: u8 = 0x21;
pub const LAYER1_ULAW: u8 = 0x22;
pub const RATE_ADAPT_56K: u8 = 0x0f;
pub const LAYER2_LAPB: u8 = 0x46;
pub const LAYER3_X25: u8 = 0x66;

pub fn layer1_to_str(proto: u8) -> &'static str {
    match proto {
        LAYER1_RATE_ADAPT => "Rate adaption",
        LAYER1_ULAW => "u-Law",
        _ => "Unknown",
    }
}

pub fn layer2_to_str(proto: u8) -> &'static str {
    match proto {
        LAYER2_LAPB => "LAPB",
        _ => "Unknown",
    }
}

pub fn layer3_to_str(proto: u8) -> &'static str {
    match proto {
        LAYER3_X25 => "X.25",
        _ => "Unknown",
    }
}
