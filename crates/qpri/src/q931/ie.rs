//! Information element codec table
//!
//! Every IE the driver understands has an entry carrying its identifier,
//! a display name, and optional decode/encode/dump handlers. The driver
//! consults the table both when building outgoing messages (walking the
//! fixed per-message IE order) and when parsing incoming ones (lookup by
//! identifier; unknown identifiers are skipped with a warning).
//!
//! Encoders append their content octets to the output buffer; appending
//! nothing means "omit this IE" and is how encoders whose mandatory
//! fields are undefined behave. An error aborts the whole message build.
//! Decoder errors drop the whole message.

use qpri_core::bearer::{LAYER1_RATE_ADAPT, TransferCap, TransferMode};
use qpri_core::codes::{
    coding_to_str, location_to_str, plan_to_str, pres_to_str, progress_to_str, CODE_CCITT,
    LOC_PRIV_NET_LOCAL_USER, LOC_USER, PLAN_UNKNOWN, PRES_NUMBER_NOT_AVAILABLE,
};
use qpri_core::{cause, pri_dump, pri_warn, Dialect, ProtocolError};

use super::call::{Call, ChanSel, MAX_NUMBER_LEN};
use super::msg::MsgType;

// ── IE identifiers ────────────────────────────────────────────────

pub const IE_BEARER_CAPABILITY: u8 = 0x04;
pub const IE_CAUSE: u8 = 0x08;
pub const IE_CALL_IDENTITY: u8 = 0x10;
pub const IE_CALL_STATE: u8 = 0x14;
pub const IE_CHANNEL_IDENT: u8 = 0x18;
pub const IE_FACILITY: u8 = 0x1c;
pub const IE_PROGRESS_INDICATOR: u8 = 0x1e;
pub const IE_NETWORK_SPEC_FAC: u8 = 0x20;
pub const IE_DISPLAY: u8 = 0x28;
pub const IE_KEYPAD: u8 = 0x2c;
pub const IE_TRANSIT_DELAY: u8 = 0x42;
pub const IE_TRANS_DELAY_SELECT: u8 = 0x43;
pub const IE_BINARY_PARAMETERS: u8 = 0x44;
pub const IE_WINDOW_SIZE: u8 = 0x45;
pub const IE_CLOSED_USER_GROUP: u8 = 0x47;
pub const IE_REVERSE_CHARGE: u8 = 0x4a;
pub const IE_INFORMATION_RATE: u8 = 0x60;
pub const IE_CALLING_PARTY_NUMBER: u8 = 0x6c;
pub const IE_CALLING_PARTY_SUBADDR: u8 = 0x6d;
pub const IE_CALLED_PARTY_NUMBER: u8 = 0x70;
pub const IE_CALLED_PARTY_SUBADDR: u8 = 0x71;
pub const IE_REDIRECTING_NUMBER: u8 = 0x74;
pub const IE_TRANSIT_NET_SELECT: u8 = 0x78;
pub const IE_RESTART_INDICATOR: u8 = 0x79;
pub const IE_LOW_LAYER_COMPAT: u8 = 0x7c;
pub const IE_HIGH_LAYER_COMPAT: u8 = 0x7d;

// Call states for the call state IE
const CALL_STATE_NULL: u8 = 0x00;
const CALL_STATE_ACTIVE: u8 = 0x0a;

pub(crate) type DecodeFn = fn(&mut Call, Dialect, MsgType, &[u8]) -> Result<(), ProtocolError>;
pub(crate) type EncodeFn = fn(&Call, Dialect, MsgType, &mut Vec<u8>) -> Result<(), ProtocolError>;
pub(crate) type DumpFn = fn(&[u8], char);

pub(crate) struct IeEntry {
    pub id: u8,
    pub name: &'static str,
    pub decode: Option<DecodeFn>,
    pub encode: Option<EncodeFn>,
    pub dump: Option<DumpFn>,
}

/// Copy a digit string out of IE content. Over-long strings are dropped
/// rather than truncated.
fn number_from(src: &[u8]) -> String {
    if src.len() > MAX_NUMBER_LEN {
        pri_warn!("number too long ({} digits), discarding", src.len());
        return String::new();
    }
    String::from_utf8_lossy(src).into_owned()
}

// ── Bearer capability ─────────────────────────────────────────────

fn decode_bearer(
    call: &mut Call,
    dialect: Dialect,
    _msg: MsgType,
    d: &[u8],
) -> Result<(), ProtocolError> {
    if d.len() < 2 {
        return Err(ProtocolError::BadIe(IE_BEARER_CAPABILITY));
    }
    if d[0] & 0x60 != 0 {
        pri_warn!("non-CCITT coding standard in bearer capability");
        return Err(ProtocolError::BadIe(IE_BEARER_CAPABILITY));
    }
    let cap = TransferCap::from_code(d[0] & 0x1f, dialect)
        .ok_or(ProtocolError::BadIe(IE_BEARER_CAPABILITY))?;
    let mode = TransferMode::from_code(d[1] & 0x7f)
        .ok_or(ProtocolError::BadIe(IE_BEARER_CAPABILITY))?;
    call.cap = Some(cap);
    call.mode = Some(mode);

    let mut pos = 2;
    if mode == TransferMode::Multirate {
        if pos >= d.len() {
            return Err(ProtocolError::BadIe(IE_BEARER_CAPABILITY));
        }
        call.multiplier = Some(d[pos] & 0x7f);
        pos += 1;
    }
    if mode == TransferMode::Packet {
        // Octets 6 and 7 instead of 5/5a
        if pos < d.len() {
            call.userl2 = Some(d[pos] & 0x7f);
            pos += 1;
        }
        if pos < d.len() {
            call.userl3 = Some(d[pos] & 0x7f);
        }
    } else if pos < d.len() {
        // A 4ESS peer stops before the user-layer octets
        let l1 = d[pos] & 0x7f;
        call.userl1 = Some(l1);
        pos += 1;
        if l1 == LAYER1_RATE_ADAPT && pos < d.len() {
            call.rate_adaption = Some(d[pos] & 0x7f);
        }
    }
    Ok(())
}

fn encode_bearer(
    call: &Call,
    dialect: Dialect,
    _msg: MsgType,
    out: &mut Vec<u8>,
) -> Result<(), ProtocolError> {
    let (cap, mode) = match (call.cap, call.mode) {
        (Some(c), Some(m)) => (c, m),
        _ => return Ok(()), // omit
    };
    out.push(0x80 | cap.code(dialect));
    out.push(0x80 | mode.code());
    if mode == TransferMode::Multirate {
        let mult = call
            .multiplier
            .ok_or(ProtocolError::BadIe(IE_BEARER_CAPABILITY))?;
        out.push(0x80 | (mult & 0x7f));
    }
    if mode == TransferMode::Packet {
        let l2 = call.userl2.ok_or(ProtocolError::BadIe(IE_BEARER_CAPABILITY))?;
        let l3 = call.userl3.ok_or(ProtocolError::BadIe(IE_BEARER_CAPABILITY))?;
        out.push(0x80 | l2);
        out.push(0x80 | l3);
    } else {
        // 4ESS takes no user-layer octets at all
        if dialect == Dialect::Att4ess {
            return Ok(());
        }
        if let Some(l1) = call.userl1 {
            out.push(0x80 | l1);
            if l1 == LAYER1_RATE_ADAPT {
                if let Some(ra) = call.rate_adaption {
                    out.push(0x80 | ra);
                }
            }
        }
    }
    Ok(())
}

fn dump_bearer(d: &[u8], prefix: char) {
    if d.len() < 2 {
        pri_dump!("{} Bearer Capability (truncated)", prefix);
        return;
    }
    pri_dump!(
        "{} Bearer Capability: [ Std: {}  Transfer capability: {:#04x}  Mode/Rate: {:#04x}",
        prefix,
        coding_to_str((d[0] >> 5) & 0x03),
        d[0] & 0x1f,
        d[1] & 0x7f
    );
    for (i, b) in d.iter().enumerate().skip(2) {
        pri_dump!("{}                     Octet {}: {:#04x} ]", prefix, i + 3, b);
    }
}

// ── Channel identification ────────────────────────────────────────

fn decode_channel_id(
    call: &mut Call,
    _dialect: Dialect,
    _msg: MsgType,
    d: &[u8],
) -> Result<(), ProtocolError> {
    if d.is_empty() {
        return Err(ProtocolError::BadIe(IE_CHANNEL_IDENT));
    }
    if d[0] & 0x20 == 0 {
        pri_warn!("channel identification for a non-PRI interface");
        return Err(ProtocolError::BadIe(IE_CHANNEL_IDENT));
    }
    if d[0] & 0x03 != 1 {
        pri_warn!("unexpected channel selection {}", d[0] & 0x03);
        return Err(ProtocolError::BadIe(IE_CHANNEL_IDENT));
    }
    call.chan_sel = if d[0] & 0x08 != 0 {
        ChanSel::Exclusive
    } else {
        ChanSel::Preferred
    };
    let mut pos = 1;
    if d[0] & 0x40 != 0 {
        // Explicit DS1 identifier
        if pos >= d.len() {
            return Err(ProtocolError::BadIe(IE_CHANNEL_IDENT));
        }
        call.ds1no = Some(d[pos] & 0x7f);
        pos += 1;
    }
    if pos < d.len() {
        if d[pos] & 0x0f != 3 {
            pri_warn!("unexpected channel type {}", d[pos] & 0x0f);
            return Err(ProtocolError::BadIe(IE_CHANNEL_IDENT));
        }
        if d[pos] & 0x60 != 0 {
            pri_warn!("invalid coding standard {}", (d[pos] >> 5) & 0x03);
            return Err(ProtocolError::BadIe(IE_CHANNEL_IDENT));
        }
        if d[pos] & 0x10 != 0 {
            // 24-bit slot map follows
            if pos + 3 >= d.len() {
                return Err(ProtocolError::BadIe(IE_CHANNEL_IDENT));
            }
            let mut map: u32 = 0;
            for x in 0..3 {
                map = (map << 8) | d[pos + 1 + x] as u32;
            }
            call.slotmap = Some(map);
        } else {
            pos += 1;
            if pos >= d.len() {
                return Err(ProtocolError::BadIe(IE_CHANNEL_IDENT));
            }
            call.channelno = Some(d[pos] & 0x7f);
        }
    }
    Ok(())
}

fn encode_channel_id(
    call: &Call,
    _dialect: Dialect,
    _msg: MsgType,
    out: &mut Vec<u8>,
) -> Result<(), ProtocolError> {
    // Interface type PRI, channel indicated
    let mut first = 0xa1u8;
    match call.chan_sel {
        ChanSel::Exclusive => first |= 0x08,
        ChanSel::Preferred => {}
        ChanSel::None => return Ok(()), // nothing retrieved; omit
    }
    if let Some(ds1) = call.ds1no {
        first |= 0x40;
        out.push(first);
        out.push(0x80 | ds1);
    } else {
        out.push(first);
    }
    if let Some(ch) = call.channelno {
        out.push(0x83);
        out.push(0x80 | ch);
        return Ok(());
    }
    if let Some(map) = call.slotmap {
        out.push(0x93);
        out.push(((map >> 16) & 0xff) as u8);
        out.push(((map >> 8) & 0xff) as u8);
        out.push((map & 0xff) as u8);
        return Ok(());
    }
    if call.ds1no.is_some() {
        return Ok(());
    }
    pri_warn!("no slot map, no channel, and no DS1 to identify");
    Err(ProtocolError::BadIe(IE_CHANNEL_IDENT))
}

fn format_binary(mut v: u32, len: u32) -> String {
    let mut s = String::with_capacity(len as usize);
    v <<= 32 - len;
    for _ in 0..len {
        s.push(if v & 0x8000_0000 != 0 { '1' } else { '0' });
        v <<= 1;
    }
    s
}

fn dump_channel_id(d: &[u8], prefix: char) {
    if d.is_empty() {
        return;
    }
    pri_dump!(
        "{} Channel ID: [ {}, {} Spare: {} {} Dchan: {} ChanSel: {}",
        prefix,
        if d[0] & 0x40 != 0 { "Explicit" } else { "Implicit" },
        if d[0] & 0x20 != 0 { "PRI" } else { "Other" },
        (d[0] & 0x10) >> 4,
        if d[0] & 0x08 != 0 { "Exclusive" } else { "Preferred" },
        (d[0] & 0x04) >> 2,
        d[0] & 0x03
    );
    let mut pos = 1;
    if d[0] & 0x40 != 0 && pos < d.len() {
        pri_dump!("{}              DS1 Identifier: {}", prefix, d[pos] & 0x7f);
        pos += 1;
    }
    if pos < d.len() {
        if d[pos] & 0x10 != 0 && pos + 3 < d.len() {
            let mut map: u32 = 0;
            for x in 0..3 {
                map = (map << 8) | d[pos + 1 + x] as u32;
            }
            pri_dump!("{}              Map: {} ]", prefix, format_binary(map, 24));
        } else if pos + 1 < d.len() {
            pri_dump!("{}              Channel: {} ]", prefix, d[pos + 1] & 0x7f);
        }
    } else {
        pri_dump!("{}              ]", prefix);
    }
}

// ── Called party number ───────────────────────────────────────────

fn decode_called(
    call: &mut Call,
    _dialect: Dialect,
    _msg: MsgType,
    d: &[u8],
) -> Result<(), ProtocolError> {
    if d.is_empty() {
        return Err(ProtocolError::BadIe(IE_CALLED_PARTY_NUMBER));
    }
    call.called_plan = Some(d[0] & 0x7f);
    call.called = number_from(&d[1..]);
    Ok(())
}

fn encode_called(
    call: &Call,
    _dialect: Dialect,
    _msg: MsgType,
    out: &mut Vec<u8>,
) -> Result<(), ProtocolError> {
    if call.called.is_empty() && call.called_plan.is_none() {
        return Ok(());
    }
    out.push(0x80 | call.called_plan.unwrap_or(PLAN_UNKNOWN));
    out.extend_from_slice(call.called.as_bytes());
    Ok(())
}

fn dump_called(d: &[u8], prefix: char) {
    if d.is_empty() {
        return;
    }
    pri_dump!(
        "{} Called Number: [ Type: {} ({}) '{}' ]",
        prefix,
        plan_to_str(d[0] & 0x7f),
        d[0] & 0x7f,
        number_from(&d[1..])
    );
}

// ── Calling party number ──────────────────────────────────────────

fn decode_calling(
    call: &mut Call,
    _dialect: Dialect,
    _msg: MsgType,
    d: &[u8],
) -> Result<(), ProtocolError> {
    if d.is_empty() {
        return Err(ProtocolError::BadIe(IE_CALLING_PARTY_NUMBER));
    }
    call.calling_plan = Some(d[0] & 0x7f);
    let mut pos = 1;
    if d[0] & 0x80 == 0 {
        // Octet 3a (presentation/screening) present
        if pos >= d.len() {
            return Err(ProtocolError::BadIe(IE_CALLING_PARTY_NUMBER));
        }
        call.calling_pres = Some(d[pos] & 0x7f);
        pos += 1;
    }
    call.calling = number_from(&d[pos..]);
    Ok(())
}

fn encode_calling(
    call: &Call,
    _dialect: Dialect,
    _msg: MsgType,
    out: &mut Vec<u8>,
) -> Result<(), ProtocolError> {
    if call.calling.is_empty() && call.calling_plan.is_none() && call.calling_pres.is_none() {
        return Ok(());
    }
    out.push(call.calling_plan.unwrap_or(PLAN_UNKNOWN));
    out.push(0x80 | call.calling_pres.unwrap_or(PRES_NUMBER_NOT_AVAILABLE));
    out.extend_from_slice(call.calling.as_bytes());
    Ok(())
}

fn dump_calling(d: &[u8], prefix: char) {
    if d.len() < 2 {
        return;
    }
    let (pres, digits) = if d[0] & 0x80 == 0 {
        (Some(d[1] & 0x7f), &d[2..])
    } else {
        (None, &d[1..])
    };
    pri_dump!(
        "{} Calling Number: [ Type: {} ({})",
        prefix,
        plan_to_str(d[0] & 0x7f),
        d[0] & 0x7f
    );
    if let Some(p) = pres {
        pri_dump!("{}                  Presentation: {} ({})", prefix, pres_to_str(p), p);
    }
    pri_dump!("{}                  '{}' ]", prefix, number_from(digits));
}

// ── Cause ─────────────────────────────────────────────────────────

fn decode_cause(
    call: &mut Call,
    _dialect: Dialect,
    _msg: MsgType,
    d: &[u8],
) -> Result<(), ProtocolError> {
    if d.len() < 2 {
        return Err(ProtocolError::BadIe(IE_CAUSE));
    }
    call.cause_loc = Some(d[0] & 0x0f);
    call.cause_code = Some((d[0] >> 5) & 0x03);
    call.cause = Some(d[1] & 0x7f);
    // Diagnostics are retained but not interpreted
    call.cause_diag = d[2..].to_vec();
    Ok(())
}

fn encode_cause(
    call: &Call,
    _dialect: Dialect,
    _msg: MsgType,
    out: &mut Vec<u8>,
) -> Result<(), ProtocolError> {
    let cause = match call.cause {
        Some(c) => c,
        None => return Ok(()),
    };
    out.push(
        0x80 | (call.cause_code.unwrap_or(CODE_CCITT) << 5)
            | call.cause_loc.unwrap_or(LOC_PRIV_NET_LOCAL_USER),
    );
    out.push(0x80 | cause);
    Ok(())
}

fn dump_cause(d: &[u8], prefix: char) {
    if d.len() < 2 {
        return;
    }
    pri_dump!(
        "{} Cause: [ Coding: {} ({})  Location: {} ({})",
        prefix,
        coding_to_str((d[0] >> 5) & 0x03),
        (d[0] >> 5) & 0x03,
        location_to_str(d[0] & 0x0f),
        d[0] & 0x0f
    );
    pri_dump!(
        "{}          Cause: {} ({}), class = {} ]",
        prefix,
        cause::cause_to_str(d[1] & 0x7f),
        d[1] & 0x7f,
        cause::cause_class_to_str(d[1] & 0x7f)
    );
    for (x, b) in d.iter().enumerate().skip(2) {
        pri_dump!("{}          Cause data {}: {:02x} ({})", prefix, x - 2, b, b);
    }
}

// ── Progress indicator ────────────────────────────────────────────

fn decode_progress(
    call: &mut Call,
    _dialect: Dialect,
    _msg: MsgType,
    d: &[u8],
) -> Result<(), ProtocolError> {
    if d.len() < 2 {
        return Err(ProtocolError::BadIe(IE_PROGRESS_INDICATOR));
    }
    call.prog_loc = Some(d[0] & 0x0f);
    call.prog_code = Some((d[0] >> 5) & 0x03);
    call.progress = Some(d[1] & 0x7f);
    Ok(())
}

fn encode_progress(
    call: &Call,
    _dialect: Dialect,
    _msg: MsgType,
    out: &mut Vec<u8>,
) -> Result<(), ProtocolError> {
    let progress = match call.progress {
        Some(p) => p,
        None => return Ok(()),
    };
    out.push(
        0x80 | (call.prog_code.unwrap_or(CODE_CCITT) << 5) | call.prog_loc.unwrap_or(LOC_USER),
    );
    out.push(0x80 | progress);
    Ok(())
}

fn dump_progress(d: &[u8], prefix: char) {
    if d.len() < 2 {
        return;
    }
    pri_dump!(
        "{} Progress Indicator: [ Coding: {} ({})  Location: {} ({})",
        prefix,
        coding_to_str((d[0] >> 5) & 0x03),
        (d[0] >> 5) & 0x03,
        location_to_str(d[0] & 0x0f),
        d[0] & 0x0f
    );
    pri_dump!(
        "{}                       Description: {} ({}) ]",
        prefix,
        progress_to_str(d[1] & 0x7f),
        d[1] & 0x7f
    );
}

// ── Restart indicator ─────────────────────────────────────────────

fn decode_restart_ind(
    call: &mut Call,
    _dialect: Dialect,
    _msg: MsgType,
    d: &[u8],
) -> Result<(), ProtocolError> {
    if d.is_empty() {
        return Err(ProtocolError::BadIe(IE_RESTART_INDICATOR));
    }
    call.restart = Some(d[0] & 0x07);
    Ok(())
}

fn encode_restart_ind(
    call: &Call,
    _dialect: Dialect,
    _msg: MsgType,
    out: &mut Vec<u8>,
) -> Result<(), ProtocolError> {
    match call.restart {
        None => Ok(()),
        Some(ri @ (0 | 6 | 7)) => {
            out.push(0x80 | ri);
            Ok(())
        }
        Some(5) => {
            // Switch compatibility
            out.push(0xa0 | 5);
            Ok(())
        }
        Some(ri) => {
            pri_warn!("invalid restart indicator value {}", ri);
            Err(ProtocolError::BadIe(IE_RESTART_INDICATOR))
        }
    }
}

fn restart_class_to_str(ri: u8) -> &'static str {
    match ri {
        0 => "Indicated Channel",
        6 => "Single DS1 Facility",
        7 => "All DS1 Facilities",
        _ => "Unknown",
    }
}

fn dump_restart_ind(d: &[u8], prefix: char) {
    if d.is_empty() {
        return;
    }
    pri_dump!(
        "{} Restart Indicator: [ Resetting {} ({}) ]",
        prefix,
        restart_class_to_str(d[0] & 0x07),
        d[0] & 0x07
    );
}

// ── Call state ────────────────────────────────────────────────────

fn decode_call_state(
    call: &mut Call,
    _dialect: Dialect,
    _msg: MsgType,
    d: &[u8],
) -> Result<(), ProtocolError> {
    if d.is_empty() {
        return Err(ProtocolError::BadIe(IE_CALL_STATE));
    }
    call.peer_state = Some(d[0] & 0x3f);
    Ok(())
}

fn encode_call_state(
    call: &Call,
    _dialect: Dialect,
    _msg: MsgType,
    out: &mut Vec<u8>,
) -> Result<(), ProtocolError> {
    let state = if call.alive { CALL_STATE_ACTIVE } else { CALL_STATE_NULL };
    out.push((CODE_CCITT << 6) | state);
    Ok(())
}

// ── Redirecting number (decode only) ──────────────────────────────

fn decode_redirecting(
    call: &mut Call,
    _dialect: Dialect,
    _msg: MsgType,
    d: &[u8],
) -> Result<(), ProtocolError> {
    if d.is_empty() {
        return Err(ProtocolError::BadIe(IE_REDIRECTING_NUMBER));
    }
    call.redirect_plan = Some(d[0] & 0x7f);
    let mut pos = 1;
    if d[0] & 0x80 == 0 {
        if pos >= d.len() {
            return Err(ProtocolError::BadIe(IE_REDIRECTING_NUMBER));
        }
        call.redirect_pres = Some(d[pos] & 0x7f);
        if d[pos] & 0x80 == 0 {
            pos += 1;
            if pos >= d.len() {
                return Err(ProtocolError::BadIe(IE_REDIRECTING_NUMBER));
            }
            call.redirect_reason = Some(d[pos] & 0x0f);
        }
        pos += 1;
    }
    call.redirect = number_from(&d[pos..]);
    Ok(())
}

// ── The table ─────────────────────────────────────────────────────

macro_rules! ie {
    ($id:expr, $name:expr) => {
        IeEntry { id: $id, name: $name, decode: None, encode: None, dump: None }
    };
    ($id:expr, $name:expr, $dec:expr, $enc:expr, $dump:expr) => {
        IeEntry { id: $id, name: $name, decode: $dec, encode: $enc, dump: $dump }
    };
}

pub(crate) static IES: &[IeEntry] = &[
    ie!(
        IE_BEARER_CAPABILITY,
        "Bearer Capability",
        Some(decode_bearer),
        Some(encode_bearer),
        Some(dump_bearer)
    ),
    ie!(IE_CAUSE, "Cause", Some(decode_cause), Some(encode_cause), Some(dump_cause)),
    ie!(IE_CALL_IDENTITY, "Call Identity"),
    ie!(IE_CALL_STATE, "Call State", Some(decode_call_state), Some(encode_call_state), None),
    ie!(
        IE_CHANNEL_IDENT,
        "Channel Identification",
        Some(decode_channel_id),
        Some(encode_channel_id),
        Some(dump_channel_id)
    ),
    ie!(IE_FACILITY, "Facility"),
    ie!(
        IE_PROGRESS_INDICATOR,
        "Progress Indicator",
        Some(decode_progress),
        Some(encode_progress),
        Some(dump_progress)
    ),
    ie!(IE_NETWORK_SPEC_FAC, "Network-Specific Facilities"),
    ie!(IE_DISPLAY, "Display"),
    ie!(IE_KEYPAD, "Keypad Facility"),
    ie!(IE_TRANSIT_DELAY, "End-to-End Transit Delay"),
    ie!(IE_TRANS_DELAY_SELECT, "Transit Delay Selection and Indication"),
    ie!(IE_BINARY_PARAMETERS, "Packet-layer Binary Parameters"),
    ie!(IE_WINDOW_SIZE, "Packet-layer Window Size"),
    ie!(IE_CLOSED_USER_GROUP, "Closed User Group"),
    ie!(IE_REVERSE_CHARGE, "Reverse Charging Indication"),
    ie!(IE_INFORMATION_RATE, "Information Rate"),
    ie!(
        IE_CALLING_PARTY_NUMBER,
        "Calling Party Number",
        Some(decode_calling),
        Some(encode_calling),
        Some(dump_calling)
    ),
    ie!(IE_CALLING_PARTY_SUBADDR, "Calling Party Subaddress"),
    ie!(
        IE_CALLED_PARTY_NUMBER,
        "Called Party Number",
        Some(decode_called),
        Some(encode_called),
        Some(dump_called)
    ),
    ie!(IE_CALLED_PARTY_SUBADDR, "Called Party Subaddress"),
    ie!(IE_REDIRECTING_NUMBER, "Redirecting Number", Some(decode_redirecting), None, None),
    ie!(IE_TRANSIT_NET_SELECT, "Transit Network Selection"),
    ie!(IE_RESTART_INDICATOR, "Restart Indicator", Some(decode_restart_ind), Some(encode_restart_ind), Some(dump_restart_ind)),
    ie!(IE_LOW_LAYER_COMPAT, "Low-layer Compatibility"),
    ie!(IE_HIGH_LAYER_COMPAT, "High-layer Compatibility"),
];

pub(crate) fn ie_entry(id: u8) -> Option<&'static IeEntry> {
    IES.iter().find(|e| e.id == id)
}

pub(crate) fn ie_name(id: u8) -> &'static str {
    ie_entry(id).map_or("Unknown Information Element", |e| e.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qpri_core::codes::{PLAN_NATIONAL_ISDN, PRES_ALLOWED_USER_NOT_SCREENED};
    use qpri_core::bearer::{LAYER1_ULAW, LAYER2_LAPB, LAYER3_X25, RATE_ADAPT_56K};
    use qpri_core::CallRef;

    fn fresh() -> Call {
        Call::new(CallRef::new_peer(1))
    }

    fn round_trip(
        enc: EncodeFn,
        dec: DecodeFn,
        src: &Call,
        dialect: Dialect,
        msg: MsgType,
    ) -> Call {
        let mut buf = Vec::new();
        enc(src, dialect, msg, &mut buf).unwrap();
        assert!(!buf.is_empty(), "encoder omitted the IE");
        let mut dst = fresh();
        dec(&mut dst, dialect, msg, &buf).unwrap();
        dst
    }

    #[test]
    fn test_bearer_speech_round_trip() {
        let mut c = fresh();
        c.cap = Some(TransferCap::Speech);
        c.mode = Some(TransferMode::Circuit64);
        c.userl1 = Some(LAYER1_ULAW);

        let d = round_trip(encode_bearer, decode_bearer, &c, Dialect::Ni2, MsgType::Setup);
        assert_eq!(d.cap, Some(TransferCap::Speech));
        assert_eq!(d.mode, Some(TransferMode::Circuit64));
        assert_eq!(d.userl1, Some(LAYER1_ULAW));
    }

    #[test]
    fn test_bearer_rate_adaption() {
        let mut c = fresh();
        c.cap = Some(TransferCap::Digital);
        c.mode = Some(TransferMode::Circuit64);
        c.userl1 = Some(LAYER1_RATE_ADAPT);
        c.rate_adaption = Some(RATE_ADAPT_56K);

        let d = round_trip(encode_bearer, decode_bearer, &c, Dialect::Ni2, MsgType::Setup);
        assert_eq!(d.userl1, Some(LAYER1_RATE_ADAPT));
        assert_eq!(d.rate_adaption, Some(RATE_ADAPT_56K));
    }

    #[test]
    fn test_bearer_multirate_multiplier() {
        let mut c = fresh();
        c.cap = Some(TransferCap::Digital);
        c.mode = Some(TransferMode::Multirate);
        c.multiplier = Some(6);
        c.userl1 = Some(LAYER1_ULAW);

        let d = round_trip(encode_bearer, decode_bearer, &c, Dialect::Ni2, MsgType::Setup);
        assert_eq!(d.mode, Some(TransferMode::Multirate));
        assert_eq!(d.multiplier, Some(6));
    }

    #[test]
    fn test_bearer_packet_layers() {
        let mut c = fresh();
        c.cap = Some(TransferCap::Digital);
        c.mode = Some(TransferMode::Packet);
        c.userl2 = Some(LAYER2_LAPB);
        c.userl3 = Some(LAYER3_X25);

        let d = round_trip(encode_bearer, decode_bearer, &c, Dialect::Ni2, MsgType::Setup);
        assert_eq!(d.userl2, Some(LAYER2_LAPB));
        assert_eq!(d.userl3, Some(LAYER3_X25));
        assert_eq!(d.userl1, None);
    }

    #[test]
    fn test_bearer_4ess_omits_user_layer() {
        let mut c = fresh();
        c.cap = Some(TransferCap::Audio31k);
        c.mode = Some(TransferMode::Circuit64);
        c.userl1 = Some(LAYER1_ULAW);

        let mut buf = Vec::new();
        encode_bearer(&c, Dialect::Att4ess, MsgType::Setup, &mut buf).unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf[0] & 0x1f, 0x08); // 4ESS audio code

        let mut d = fresh();
        decode_bearer(&mut d, Dialect::Att4ess, MsgType::Setup, &buf).unwrap();
        assert_eq!(d.cap, Some(TransferCap::Audio31k));
        assert_eq!(d.userl1, None);
    }

    #[test]
    fn test_bearer_rejects_nonstandard_coding() {
        let mut d = fresh();
        assert!(decode_bearer(&mut d, Dialect::Ni2, MsgType::Setup, &[0xc0, 0x90]).is_err());
    }

    #[test]
    fn test_bearer_omitted_when_unset() {
        let c = fresh();
        let mut buf = Vec::new();
        encode_bearer(&c, Dialect::Ni2, MsgType::Setup, &mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_channel_id_number_round_trip() {
        let mut c = fresh();
        c.chan_sel = ChanSel::Exclusive;
        c.channelno = Some(1);

        let d = round_trip(encode_channel_id, decode_channel_id, &c, Dialect::Ni2, MsgType::Setup);
        assert_eq!(d.chan_sel, ChanSel::Exclusive);
        assert_eq!(d.channelno, Some(1));
        assert_eq!(d.slotmap, None);
    }

    #[test]
    fn test_channel_id_slotmap_round_trip() {
        let mut c = fresh();
        c.chan_sel = ChanSel::Preferred;
        c.slotmap = Some(0x00aa55);

        let d = round_trip(encode_channel_id, decode_channel_id, &c, Dialect::Ni2, MsgType::Setup);
        assert_eq!(d.chan_sel, ChanSel::Preferred);
        assert_eq!(d.slotmap, Some(0x00aa55));
        assert_eq!(d.channelno, None);
    }

    #[test]
    fn test_channel_id_with_ds1() {
        let mut c = fresh();
        c.chan_sel = ChanSel::Exclusive;
        c.ds1no = Some(2);
        c.channelno = Some(7);

        let d = round_trip(encode_channel_id, decode_channel_id, &c, Dialect::Ni2, MsgType::Setup);
        assert_eq!(d.ds1no, Some(2));
        assert_eq!(d.channelno, Some(7));
    }

    #[test]
    fn test_channel_id_rejects_non_pri() {
        let mut d = fresh();
        // Interface type bit clear
        assert!(decode_channel_id(&mut d, Dialect::Ni2, MsgType::Setup, &[0x81, 0x81]).is_err());
    }

    #[test]
    fn test_channel_id_rejects_bad_selection() {
        let mut d = fresh();
        assert!(decode_channel_id(&mut d, Dialect::Ni2, MsgType::Setup, &[0xa3]).is_err());
    }

    #[test]
    fn test_called_round_trip() {
        let mut c = fresh();
        c.called_plan = Some(PLAN_NATIONAL_ISDN);
        c.called = "5552000".to_string();

        let d = round_trip(encode_called, decode_called, &c, Dialect::Ni2, MsgType::Setup);
        assert_eq!(d.called_plan, Some(PLAN_NATIONAL_ISDN));
        assert_eq!(d.called, "5552000");
    }

    #[test]
    fn test_calling_round_trip() {
        let mut c = fresh();
        c.calling_plan = Some(PLAN_NATIONAL_ISDN);
        c.calling_pres = Some(PRES_ALLOWED_USER_NOT_SCREENED);
        c.calling = "15551234".to_string();

        let d = round_trip(encode_calling, decode_calling, &c, Dialect::Ni2, MsgType::Setup);
        assert_eq!(d.calling_plan, Some(PLAN_NATIONAL_ISDN));
        assert_eq!(d.calling_pres, Some(PRES_ALLOWED_USER_NOT_SCREENED));
        assert_eq!(d.calling, "15551234");
    }

    #[test]
    fn test_cause_round_trip_with_diagnostics() {
        let mut c = fresh();
        c.cause = Some(16);
        c.cause_code = Some(CODE_CCITT);
        c.cause_loc = Some(LOC_PRIV_NET_LOCAL_USER);

        let mut buf = Vec::new();
        encode_cause(&c, Dialect::Ni2, MsgType::Disconnect, &mut buf).unwrap();
        // Peer may append diagnostics; they are retained verbatim
        buf.extend_from_slice(&[0x01, 0x02]);

        let mut d = fresh();
        decode_cause(&mut d, Dialect::Ni2, MsgType::Disconnect, &buf).unwrap();
        assert_eq!(d.cause, Some(16));
        assert_eq!(d.cause_loc, Some(LOC_PRIV_NET_LOCAL_USER));
        assert_eq!(d.cause_diag, vec![0x01, 0x02]);
    }

    #[test]
    fn test_progress_round_trip() {
        let mut c = fresh();
        c.progress = Some(0x8);
        c.prog_code = Some(CODE_CCITT);
        c.prog_loc = Some(LOC_PRIV_NET_LOCAL_USER);

        let d = round_trip(encode_progress, decode_progress, &c, Dialect::Ni2, MsgType::Alerting);
        assert_eq!(d.progress, Some(0x8));
        assert_eq!(d.prog_loc, Some(LOC_PRIV_NET_LOCAL_USER));
    }

    #[test]
    fn test_restart_ind_round_trip() {
        for ri in [0u8, 6, 7] {
            let mut c = fresh();
            c.restart = Some(ri);
            let d = round_trip(
                encode_restart_ind,
                decode_restart_ind,
                &c,
                Dialect::Ni2,
                MsgType::Restart,
            );
            assert_eq!(d.restart, Some(ri));
        }
    }

    #[test]
    fn test_restart_ind_rejects_invalid() {
        let mut c = fresh();
        c.restart = Some(3);
        let mut buf = Vec::new();
        assert!(encode_restart_ind(&c, Dialect::Ni2, MsgType::Restart, &mut buf).is_err());
    }

    #[test]
    fn test_redirecting_decode() {
        // plan (ext clear), pres (ext clear), reason (ext set), digits
        let d = [0x21, 0x00, 0x8f, b'5', b'5', b'5'];
        let mut c = fresh();
        decode_redirecting(&mut c, Dialect::Ni2, MsgType::Setup, &d).unwrap();
        assert_eq!(c.redirect_plan, Some(0x21));
        assert_eq!(c.redirect_pres, Some(0x00));
        assert_eq!(c.redirect_reason, Some(0x0f));
        assert_eq!(c.redirect, "555");
    }

    #[test]
    fn test_table_lookup() {
        assert_eq!(ie_name(IE_BEARER_CAPABILITY), "Bearer Capability");
        assert_eq!(ie_name(0x55), "Unknown Information Element");
        assert!(ie_entry(IE_FACILITY).unwrap().decode.is_none());
    }
}
