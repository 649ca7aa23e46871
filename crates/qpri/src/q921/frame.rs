//! Layer 2 frame codec
//!
//! Fixed-layout octet packing for the LAPD address and control fields.
//!
//! Address (two octets): SAPI(6) C/R(1) EA0(1); TEI(7) EA1(1).
//! Control:
//! - I-frame: N(S)(7) 0(1); N(R)(7) P(1)
//! - S-frame: 0000 SS(2) 01; N(R)(7) P/F(1)
//! - U-frame: M3(3) P/F(1) M2(2) 11
//!
//! Every builder reserves two zero tail octets where the framer writes
//! the FCS.

use qpri_core::{pri_dump, ProtocolError};

/// SAPI for call control procedures.
pub const SAPI_CALL_CTRL: u8 = 0;

/// Fixed point-to-point TEI.
pub const TEI_PTP: u8 = 0;

/// Broadcast TEI; frames addressed to it are dropped.
pub const TEI_GROUP: u8 = 127;

/// Reserved FCS tail length.
pub const FCS_LEN: usize = 2;

/// Modulo-128 sequence increment.
#[inline]
pub fn seq_inc(x: u8) -> u8 {
    (x + 1) & 0x7f
}

/// Layer 2 address field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub sapi: u8,
    pub cr: bool,
    pub tei: u8,
}

impl Address {
    /// Call-control address on the point-to-point TEI.
    pub fn call_ctrl(cr: bool) -> Self {
        Address { sapi: SAPI_CALL_CTRL, cr, tei: TEI_PTP }
    }

    pub fn pack(&self) -> [u8; 2] {
        [
            (self.sapi << 2) | ((self.cr as u8) << 1),
            (self.tei << 1) | 0x01,
        ]
    }

    /// Unpack and validate the EA bits: EA0 must be 0, EA1 must be 1.
    pub fn unpack(b: &[u8]) -> Result<Address, ProtocolError> {
        if b.len() < 2 {
            return Err(ProtocolError::ShortFrame);
        }
        if b[0] & 0x01 != 0 || b[1] & 0x01 != 1 {
            return Err(ProtocolError::BadAddress);
        }
        Ok(Address {
            sapi: b[0] >> 2,
            cr: b[0] & 0x02 != 0,
            tei: b[1] >> 1,
        })
    }
}

/// Supervisory function codes.
pub const S_RR: u8 = 0;
pub const S_RNR: u8 = 1;
pub const S_REJ: u8 = 2;

/// Unnumbered frame kinds, classified from (M3, M2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UFunc {
    Sabme,
    Ua,
    Dm,
    Disc,
    Ui,
    Frmr,
    Xid,
    Unknown,
}

/// Decoded control field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    I { ns: u8, nr: u8, p: bool },
    S { ss: u8, nr: u8, pf: bool },
    U { m3: u8, m2: u8, pf: bool },
}

impl Control {
    /// Decode the control octets at the start of `b` (the bytes right
    /// after the address field).
    pub fn unpack(b: &[u8]) -> Result<Control, ProtocolError> {
        if b.is_empty() {
            return Err(ProtocolError::ShortFrame);
        }
        match b[0] & 0x03 {
            0x03 => Ok(Control::U {
                m3: b[0] >> 5,
                m2: (b[0] >> 2) & 0x03,
                pf: b[0] & 0x10 != 0,
            }),
            0x01 => {
                if b.len() < 2 {
                    return Err(ProtocolError::ShortFrame);
                }
                Ok(Control::S {
                    ss: (b[0] >> 2) & 0x03,
                    nr: b[1] >> 1,
                    pf: b[1] & 0x01 != 0,
                })
            }
            _ => {
                // Low bit clear: informational
                if b.len() < 2 {
                    return Err(ProtocolError::ShortFrame);
                }
                Ok(Control::I {
                    ns: b[0] >> 1,
                    nr: b[1] >> 1,
                    p: b[1] & 0x01 != 0,
                })
            }
        }
    }

    /// Number of control octets this variant occupies.
    pub fn len(&self) -> usize {
        match self {
            Control::U { .. } => 1,
            _ => 2,
        }
    }

    pub fn ufunc(&self) -> Option<UFunc> {
        match self {
            Control::U { m3, m2, .. } => Some(match (m3, m2) {
                (3, 3) => UFunc::Sabme,
                (3, 0) => UFunc::Ua,
                (0, 3) => UFunc::Dm,
                (2, 0) => UFunc::Disc,
                (0, 0) => UFunc::Ui,
                (4, _) => UFunc::Frmr,
                (5, _) => UFunc::Xid,
                _ => UFunc::Unknown,
            }),
            _ => None,
        }
    }
}

/// A parsed inbound frame (FCS already removed).
#[derive(Debug)]
pub struct Frame<'a> {
    pub addr: Address,
    pub ctrl: Control,
    pub payload: &'a [u8],
}

/// Parse a frame. `buf` must no longer contain the FCS tail.
pub fn parse(buf: &[u8]) -> Result<Frame<'_>, ProtocolError> {
    let addr = Address::unpack(buf)?;
    let ctrl = Control::unpack(&buf[2..])?;
    Ok(Frame {
        addr,
        ctrl,
        payload: &buf[2 + ctrl.len()..],
    })
}

// ── Builders ──────────────────────────────────────────────────────

/// Build an unnumbered frame (3 octets + FCS tail).
pub fn build_u(addr: Address, m3: u8, m2: u8, pf: bool) -> Vec<u8> {
    let a = addr.pack();
    vec![
        a[0],
        a[1],
        0x03 | (m2 << 2) | ((pf as u8) << 4) | (m3 << 5),
        0,
        0,
    ]
}

/// Build a supervisory frame (4 octets + FCS tail).
pub fn build_s(addr: Address, ss: u8, nr: u8, pf: bool) -> Vec<u8> {
    let a = addr.pack();
    vec![a[0], a[1], 0x01 | (ss << 2), (nr << 1) | pf as u8, 0, 0]
}

/// Build an information frame (4 octets + payload + FCS tail).
pub fn build_i(addr: Address, ns: u8, nr: u8, p: bool, payload: &[u8]) -> Vec<u8> {
    let a = addr.pack();
    let mut buf = Vec::with_capacity(4 + payload.len() + FCS_LEN);
    buf.push(a[0]);
    buf.push(a[1]);
    buf.push(ns << 1);
    buf.push((nr << 1) | p as u8);
    buf.extend_from_slice(payload);
    buf.push(0);
    buf.push(0);
    buf
}

/// Rewrite the N(R)/P octet of a prebuilt I-frame in place; used when the
/// head of the transmit queue is repolled.
pub fn repoll_i(buf: &mut [u8], nr: u8) {
    debug_assert!(buf.len() >= 4);
    buf[3] = (nr << 1) | 0x01;
}

// ── Debug dump ────────────────────────────────────────────────────

/// Dump an interpreted frame, `q921_dump` style. `tx` selects the
/// direction marker; `showraw` additionally prints the raw octets.
pub fn dump(buf: &[u8], showraw: bool, tx: bool) {
    let c = if tx { '>' } else { '<' };
    if showraw {
        let hex: Vec<String> = buf.iter().map(|b| format!("{:02x}", b)).collect();
        pri_dump!("{}   [ {} ]", c, hex.join(" "));
    }
    let frame = match parse(buf) {
        Ok(f) => f,
        Err(e) => {
            pri_dump!("{} undecodable frame ({})", c, e);
            return;
        }
    };
    match frame.ctrl {
        Control::I { .. } => pri_dump!("{} Informational frame:", c),
        Control::S { .. } => pri_dump!("{} Supervisory frame:", c),
        Control::U { .. } => pri_dump!("{} Unnumbered frame:", c),
    }
    pri_dump!(
        "{} SAPI: {:02}  C/R: {} EA: 0 / TEI: {:03} EA: 1",
        c,
        frame.addr.sapi,
        frame.addr.cr as u8,
        frame.addr.tei
    );
    match frame.ctrl {
        Control::I { ns, nr, p } => {
            pri_dump!(
                "{} N(S): {:03}  N(R): {:03}  P: {}  {} bytes of data",
                c,
                ns,
                nr,
                p as u8,
                frame.payload.len()
            );
        }
        Control::S { ss, nr, pf } => {
            pri_dump!("{} S: {}  N(R): {:03}  P/F: {}", c, ss, nr, pf as u8);
        }
        Control::U { m3, m2, pf } => {
            pri_dump!("{} M3: {}  P/F: {}  M2: {}", c, m3, pf as u8, m2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_round_trip() {
        for cr in [false, true] {
            let a = Address::call_ctrl(cr);
            let packed = a.pack();
            assert_eq!(packed[0] & 0x01, 0); // EA0
            assert_eq!(packed[1] & 0x01, 1); // EA1
            assert_eq!(Address::unpack(&packed).unwrap(), a);
        }
    }

    #[test]
    fn test_address_rejects_bad_ea() {
        assert_eq!(Address::unpack(&[0x01, 0x01]), Err(ProtocolError::BadAddress));
        assert_eq!(Address::unpack(&[0x00, 0x00]), Err(ProtocolError::BadAddress));
    }

    #[test]
    fn test_i_frame_round_trip() {
        let addr = Address::call_ctrl(true);
        let buf = build_i(addr, 5, 3, false, &[0xde, 0xad]);
        let f = parse(&buf[..buf.len() - FCS_LEN]).unwrap();
        assert_eq!(f.addr, addr);
        assert_eq!(f.ctrl, Control::I { ns: 5, nr: 3, p: false });
        assert_eq!(f.payload, &[0xde, 0xad]);
    }

    #[test]
    fn test_s_frame_round_trip() {
        let addr = Address::call_ctrl(false);
        let buf = build_s(addr, S_RR, 42, true);
        let f = parse(&buf[..buf.len() - FCS_LEN]).unwrap();
        assert_eq!(f.ctrl, Control::S { ss: S_RR, nr: 42, pf: true });
        assert!(f.payload.is_empty());
    }

    #[test]
    fn test_u_frame_kinds() {
        let addr = Address::call_ctrl(true);
        for (m3, m2, func) in [
            (3, 3, UFunc::Sabme),
            (3, 0, UFunc::Ua),
            (0, 3, UFunc::Dm),
            (2, 0, UFunc::Disc),
            (0, 0, UFunc::Ui),
        ] {
            let buf = build_u(addr, m3, m2, true);
            let f = parse(&buf[..buf.len() - FCS_LEN]).unwrap();
            assert_eq!(f.ctrl, Control::U { m3, m2, pf: true });
            assert_eq!(f.ctrl.ufunc(), Some(func));
        }
    }

    #[test]
    fn test_repoll() {
        let addr = Address::call_ctrl(true);
        let mut buf = build_i(addr, 0, 0, false, &[1, 2, 3]);
        repoll_i(&mut buf, 9);
        let f = parse(&buf[..buf.len() - FCS_LEN]).unwrap();
        assert_eq!(f.ctrl, Control::I { ns: 0, nr: 9, p: true });
    }

    #[test]
    fn test_seq_inc_wraps() {
        assert_eq!(seq_inc(0), 1);
        assert_eq!(seq_inc(126), 127);
        assert_eq!(seq_inc(127), 0);
    }

    #[test]
    fn test_short_frames() {
        assert!(parse(&[0x02]).is_err());
        // U-frame needs one control octet only
        let addr = Address::call_ctrl(true).pack();
        assert!(parse(&[addr[0], addr[1], 0x7f]).is_ok());
        // I/S frames need two
        assert!(parse(&[addr[0], addr[1], 0x00]).is_err());
        assert!(parse(&[addr[0], addr[1], 0x01]).is_err());
    }
}
