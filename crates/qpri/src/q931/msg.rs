//! Q.931 message header codec
//!
//! Header layout: protocol discriminator octet, call reference length
//! octet, call reference bytes (origin flag in the top bit of the first),
//! message type octet, then IEs.

use qpri_core::{CallRef, ProtocolError};

/// Protocol discriminator for call control.
pub const PD_Q931: u8 = 0x08;

/// Maintenance dialect; messages are acknowledged by reflecting them
/// with the opcode lowered by `MAINT_ACK_DELTA`.
pub const PD_MAINTENANCE: u8 = 0x03;
pub const MAINT_ACK_DELTA: u8 = 0x08;

/// Message types the engine terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgType {
    Alerting,
    CallProceeding,
    Progress,
    Setup,
    Connect,
    ConnectAcknowledge,
    Disconnect,
    Release,
    ReleaseComplete,
    Restart,
    RestartAcknowledge,
    Status,
    StatusEnquiry,
    Information,
}

impl MsgType {
    pub fn code(self) -> u8 {
        match self {
            MsgType::Alerting => 0x01,
            MsgType::CallProceeding => 0x02,
            MsgType::Progress => 0x03,
            MsgType::Setup => 0x05,
            MsgType::Connect => 0x07,
            MsgType::ConnectAcknowledge => 0x0f,
            MsgType::Disconnect => 0x45,
            MsgType::Restart => 0x46,
            MsgType::Release => 0x4d,
            MsgType::RestartAcknowledge => 0x4e,
            MsgType::ReleaseComplete => 0x5a,
            MsgType::StatusEnquiry => 0x75,
            MsgType::Information => 0x7b,
            MsgType::Status => 0x7d,
        }
    }

    pub fn from_code(code: u8) -> Option<MsgType> {
        Some(match code {
            0x01 => MsgType::Alerting,
            0x02 => MsgType::CallProceeding,
            0x03 => MsgType::Progress,
            0x05 => MsgType::Setup,
            0x07 => MsgType::Connect,
            0x0f => MsgType::ConnectAcknowledge,
            0x45 => MsgType::Disconnect,
            0x46 => MsgType::Restart,
            0x4d => MsgType::Release,
            0x4e => MsgType::RestartAcknowledge,
            0x5a => MsgType::ReleaseComplete,
            0x75 => MsgType::StatusEnquiry,
            0x7b => MsgType::Information,
            0x7d => MsgType::Status,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            MsgType::Alerting => "ALERTING",
            MsgType::CallProceeding => "CALL PROCEEDING",
            MsgType::Progress => "PROGRESS",
            MsgType::Setup => "SETUP",
            MsgType::Connect => "CONNECT",
            MsgType::ConnectAcknowledge => "CONNECT ACKNOWLEDGE",
            MsgType::Disconnect => "DISCONNECT",
            MsgType::Release => "RELEASE",
            MsgType::ReleaseComplete => "RELEASE COMPLETE",
            MsgType::Restart => "RESTART",
            MsgType::RestartAcknowledge => "RESTART ACKNOWLEDGE",
            MsgType::Status => "STATUS",
            MsgType::StatusEnquiry => "STATUS ENQUIRY",
            MsgType::Information => "INFORMATION",
        }
    }
}

/// Parsed Q.931 message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsgHeader {
    pub pd: u8,
    pub cref: CallRef,
    /// Raw message type octet (decoded only for PD_Q931)
    pub msg: u8,
    /// Offset of the first IE octet
    pub ies_at: usize,
}

/// Parse the header of an inbound message. Parsing order is strict:
/// discriminator, call reference length, call reference bytes, message
/// type.
pub fn parse_header(buf: &[u8]) -> Result<MsgHeader, ProtocolError> {
    if buf.len() < 2 {
        return Err(ProtocolError::ShortFrame);
    }
    let pd = buf[0];
    let crlen = (buf[1] & 0x0f) as usize;
    if crlen > 2 {
        return Err(ProtocolError::BadCallRef);
    }
    if buf.len() < 2 + crlen + 1 {
        return Err(ProtocolError::ShortFrame);
    }
    let cref = match crlen {
        0 => CallRef::GLOBAL,
        1 => {
            let b = buf[2];
            if b & 0x80 != 0 {
                CallRef::new_local((b & 0x7f) as u16)
            } else {
                CallRef::new_peer((b & 0x7f) as u16)
            }
        }
        _ => {
            let raw = ((buf[2] as u16) << 8) | buf[3] as u16;
            CallRef::from_wire_rx(raw)
        }
    };
    Ok(MsgHeader {
        pd,
        cref,
        msg: buf[2 + crlen],
        ies_at: 3 + crlen,
    })
}

/// Append a call-control header (two call reference bytes) to `out`.
pub fn build_header(out: &mut Vec<u8>, cref: CallRef, msg: MsgType) {
    let wire = cref.wire_tx();
    out.push(PD_Q931);
    out.push(0x02);
    out.push((wire >> 8) as u8);
    out.push((wire & 0xff) as u8);
    out.push(msg.code());
}
