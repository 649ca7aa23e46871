//! Q.931 call control engine
//!
//! Per-call state machines for incoming and outgoing calls. Messages are
//! built by walking a fixed IE order per message type through the codec
//! table, and parsed strictly in header order: protocol discriminator,
//! call reference length, call reference, message type, IEs.
//!
//! The engine owns the call directory and the next-reference allocator;
//! the controller pump delivers I-frame payloads here and collects the
//! single upward event a message may produce.

pub(crate) mod call;
pub mod ie;
pub mod msg;

use qpri_core::bearer::LAYER1_ULAW;
use qpri_core::cause::{
    cause_to_str, CAUSE_BEARERCAPABILITY_NOTIMPL, CAUSE_INTERWORKING,
    CAUSE_RESPONSE_TO_STATUS_ENQUIRY,
};
use qpri_core::codes::{
    PLAN_UNKNOWN, PRES_ALLOWED_NETWORK_NUMBER, PRES_ALLOWED_USER_NOT_SCREENED,
    PRES_NUMBER_NOT_AVAILABLE, CODE_CCITT, LOC_PRIV_NET_LOCAL_USER, LOC_USER,
    PROG_CALLED_NOT_ISDN, PROG_CALLER_NOT_ISDN, PROG_INBAND_AVAILABLE,
};
use qpri_core::{
    pri_debug, pri_dump, pri_error, pri_warn, CallRef, DebugFlags, Dialect, PriError, PriEvent,
    PriResult, ProtocolError, RingEvent, TransferCap, TransferMode,
};

use crate::controller::Pri;
use crate::io::FrameIo;
use self::call::{Call, ChanSel};
use self::ie::{
    ie_entry, ie_name, IE_BEARER_CAPABILITY, IE_CALLED_PARTY_NUMBER, IE_CALLING_PARTY_NUMBER,
    IE_CALL_STATE, IE_CAUSE, IE_CHANNEL_IDENT, IE_PROGRESS_INDICATOR, IE_RESTART_INDICATOR,
};
use self::msg::{MsgType, MAINT_ACK_DELTA, PD_MAINTENANCE, PD_Q931};

// Fixed IE order per outgoing message type
static SETUP_IES: &[u8] = &[
    IE_BEARER_CAPABILITY,
    IE_CHANNEL_IDENT,
    IE_PROGRESS_INDICATOR,
    IE_CALLING_PARTY_NUMBER,
    IE_CALLED_PARTY_NUMBER,
];
static CALL_PROCEEDING_IES: &[u8] = &[IE_CHANNEL_IDENT];
static ALERTING_IES: &[u8] = &[IE_CHANNEL_IDENT, IE_PROGRESS_INDICATOR];
static CONNECT_IES: &[u8] = &[IE_CHANNEL_IDENT, IE_PROGRESS_INDICATOR];
static CONNECT_ACK_IES: &[u8] = &[];
static DISCONNECT_IES: &[u8] = &[IE_CAUSE];
static RELEASE_IES: &[u8] = &[IE_CAUSE];
static RELEASE_COMPLETE_IES: &[u8] = &[];
static RESTART_IES: &[u8] = &[IE_CHANNEL_IDENT, IE_RESTART_INDICATOR];
static RESTART_ACK_IES: &[u8] = &[IE_CHANNEL_IDENT, IE_RESTART_INDICATOR];
static STATUS_IES: &[u8] = &[IE_CAUSE, IE_CALL_STATE];
static INFORMATION_IES: &[u8] = &[IE_CALLED_PARTY_NUMBER];

/// Parameters for an outbound SETUP.
#[derive(Debug, Clone)]
pub struct SetupRequest {
    pub capability: TransferCap,
    /// Bearer channel to place the call on; mandatory
    pub channel: u8,
    pub exclusive: bool,
    pub non_isdn: bool,
    /// Empty string means "no caller id"
    pub caller: String,
    pub caller_plan: u8,
    pub caller_pres: u8,
    pub called: String,
    pub called_plan: u8,
}

impl SetupRequest {
    pub fn new(channel: u8, called: &str) -> Self {
        SetupRequest {
            capability: TransferCap::Speech,
            channel,
            exclusive: false,
            non_isdn: false,
            caller: String::new(),
            caller_plan: PLAN_UNKNOWN,
            caller_pres: PRES_ALLOWED_USER_NOT_SCREENED,
            called: called.to_string(),
            called_plan: PLAN_UNKNOWN,
        }
    }

    pub fn capability(mut self, cap: TransferCap) -> Self {
        self.capability = cap;
        self
    }

    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn non_isdn(mut self, non_isdn: bool) -> Self {
        self.non_isdn = non_isdn;
        self
    }

    pub fn caller(mut self, number: &str, plan: u8, pres: u8) -> Self {
        self.caller = number.to_string();
        self.caller_plan = plan;
        self.caller_pres = pres;
        self
    }

    pub fn called_plan(mut self, plan: u8) -> Self {
        self.called_plan = plan;
        self
    }
}

/// Build one complete message: header plus the encodable IEs from the
/// ordered list. Encoders that append nothing are omitted; an encoder
/// error aborts the build.
fn build_message(
    call: &Call,
    dialect: Dialect,
    mt: MsgType,
    ies: &[u8],
) -> PriResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(260);
    msg::build_header(&mut buf, call.cref, mt);
    for &id in ies {
        let entry = match ie_entry(id) {
            Some(e) => e,
            None => {
                pri_error!("unknown IE {:#04x} in build list", id);
                return Err(ProtocolError::BadIe(id).into());
            }
        };
        let enc = match entry.encode {
            Some(e) => e,
            None => {
                pri_error!("don't know how to add IE {} ({:#04x})", entry.name, id);
                return Err(ProtocolError::BadIe(id).into());
            }
        };
        let start = buf.len();
        buf.push(id);
        buf.push(0);
        if let Err(e) = enc(call, dialect, mt, &mut buf) {
            pri_error!("unable to add IE '{}'", entry.name);
            buf.truncate(start);
            return Err(e.into());
        }
        let content = buf.len() - start - 2;
        if content == 0 {
            // Encoder decided its content is undefined
            buf.truncate(start);
        } else if content > 0xff {
            pri_error!("IE '{}' content too long ({})", entry.name, content);
            return Err(ProtocolError::BadIe(id).into());
        } else {
            buf[start + 1] = content as u8;
        }
    }
    Ok(buf)
}

/// Dump one interpreted message, IEs included.
fn dump_message(buf: &[u8], tx: bool) {
    let c = if tx { '>' } else { '<' };
    let h = match msg::parse_header(buf) {
        Ok(h) => h,
        Err(e) => {
            pri_dump!("{} undecodable message ({})", c, e);
            return;
        }
    };
    pri_dump!("{} Protocol Discriminator: {:#04x}", c, h.pd);
    pri_dump!("{} Call Ref: {}", c, h.cref);
    pri_dump!(
        "{} Message type: {} ({:#04x})",
        c,
        MsgType::from_code(h.msg).map_or("Unknown Message Type", |m| m.name()),
        h.msg
    );
    let mut x = h.ies_at;
    while x < buf.len() {
        let id = buf[x];
        if id & 0x80 != 0 {
            pri_dump!("{} Single-octet IE: {:#04x}", c, id);
            x += 1;
            continue;
        }
        if x + 1 >= buf.len() {
            pri_dump!("{} truncated IE {:#04x}", c, id);
            return;
        }
        let len = buf[x + 1] as usize;
        if x + 2 + len > buf.len() {
            pri_dump!("{} truncated IE {:#04x}", c, id);
            return;
        }
        let content = &buf[x + 2..x + 2 + len];
        match ie_entry(id).and_then(|e| e.dump) {
            Some(dump) => dump(content, c),
            None => pri_dump!("{} IE: {} ({:#04x}, len = {})", c, ie_name(id), id, len),
        }
        x += 2 + len;
    }
}

impl<F: FrameIo> Pri<F> {
    fn q931_send_message(&mut self, cref: CallRef, mt: MsgType, ies: &[u8]) -> PriResult<()> {
        let buf = {
            let call = self.calls.find(cref).ok_or(PriError::UnknownCall)?;
            build_message(call, self.dialect, mt, ies)?
        };
        if self.debug.contains(DebugFlags::Q931_DUMP) {
            dump_message(&buf, true);
        }
        self.stats.q931_tx += 1;
        self.q921_transmit_iframe(&buf, true)
    }

    // ── Message senders ───────────────────────────────────────────

    pub(crate) fn q931_call_proceeding(&mut self, cref: CallRef) -> PriResult<()> {
        let call = self.calls.find_mut(cref).ok_or(PriError::UnknownCall)?;
        call.proceeding_sent = true;
        self.q931_send_message(cref, MsgType::CallProceeding, CALL_PROCEEDING_IES)
    }

    pub(crate) fn q931_alerting(
        &mut self,
        cref: CallRef,
        channel: Option<u8>,
        info: bool,
    ) -> PriResult<()> {
        let proceeding_sent = {
            let call = self.calls.find_mut(cref).ok_or(PriError::UnknownCall)?;
            if let Some(ch) = channel {
                call.channelno = Some(ch);
            }
            call.chan_sel = ChanSel::Exclusive;
            if info {
                call.prog_loc = Some(LOC_PRIV_NET_LOCAL_USER);
                call.prog_code = Some(CODE_CCITT);
                call.progress = Some(PROG_INBAND_AVAILABLE);
            } else {
                call.progress = None;
            }
            call.proceeding_sent
        };
        if !proceeding_sent {
            self.q931_call_proceeding(cref)?;
        }
        self.q931_send_message(cref, MsgType::Alerting, ALERTING_IES)
    }

    pub(crate) fn q931_connect(
        &mut self,
        cref: CallRef,
        channel: Option<u8>,
        non_isdn: bool,
    ) -> PriResult<()> {
        let dialect = self.dialect;
        {
            let call = self.calls.find_mut(cref).ok_or(PriError::UnknownCall)?;
            if let Some(ch) = channel {
                call.channelno = Some(ch);
            }
            call.chan_sel = ChanSel::Exclusive;
            if non_isdn && dialect != Dialect::Dms100 {
                call.prog_loc = Some(LOC_PRIV_NET_LOCAL_USER);
                call.prog_code = Some(CODE_CCITT);
                call.progress = Some(PROG_CALLED_NOT_ISDN);
            } else {
                call.progress = None;
            }
        }
        self.q931_send_message(cref, MsgType::Connect, CONNECT_IES)
    }

    pub(crate) fn q931_release(&mut self, cref: CallRef, cause: Option<u8>) -> PriResult<()> {
        let send = {
            let call = self.calls.find_mut(cref).ok_or(PriError::UnknownCall)?;
            if call.alive {
                call.alive = false;
                call.cause = cause;
                call.cause_code = Some(CODE_CCITT);
                call.cause_loc = Some(LOC_PRIV_NET_LOCAL_USER);
                true
            } else {
                false
            }
        };
        if send {
            self.q931_send_message(cref, MsgType::Release, RELEASE_IES)
        } else {
            Ok(())
        }
    }

    pub(crate) fn q931_disconnect(&mut self, cref: CallRef, cause: Option<u8>) -> PriResult<()> {
        let send = {
            let call = self.calls.find_mut(cref).ok_or(PriError::UnknownCall)?;
            if call.alive {
                call.alive = false;
                call.cause = cause;
                call.cause_code = Some(CODE_CCITT);
                call.cause_loc = Some(LOC_PRIV_NET_LOCAL_USER);
                true
            } else {
                false
            }
        };
        if send {
            self.q931_send_message(cref, MsgType::Disconnect, DISCONNECT_IES)
        } else {
            Ok(())
        }
    }

    pub(crate) fn q931_setup(&mut self, cref: CallRef, req: &SetupRequest) -> PriResult<()> {
        if req.channel == 0 {
            return Err(PriError::NoChannel);
        }
        if req.called.is_empty() {
            return Err(PriError::NoCalledNumber);
        }
        let dialect = self.dialect;
        {
            let call = self.calls.find_mut(cref).ok_or(PriError::UnknownCall)?;
            call.cap = Some(req.capability);
            call.mode = Some(TransferMode::Circuit64);
            call.userl1 = Some(LAYER1_ULAW);
            call.channelno = Some(req.channel);
            call.slotmap = None;
            call.ds1no = None;
            call.non_isdn = req.non_isdn;
            call.chan_sel = if req.exclusive { ChanSel::Exclusive } else { ChanSel::Preferred };
            if !req.caller.is_empty() {
                call.calling = req.caller.clone();
                call.calling_plan = Some(req.caller_plan);
                let mut pres = req.caller_pres;
                if matches!(dialect, Dialect::Dms100 | Dialect::Att4ess) && pres & 0x7c == 0 {
                    // These switches reject user-provided presentation bits
                    pres = PRES_ALLOWED_NETWORK_NUMBER;
                }
                call.calling_pres = Some(pres);
            } else {
                call.calling.clear();
                call.calling_plan = Some(PLAN_UNKNOWN);
                call.calling_pres = Some(PRES_NUMBER_NOT_AVAILABLE);
            }
            call.called = req.called.clone();
            call.called_plan = Some(req.called_plan);
            if req.non_isdn && dialect == Dialect::Ni2 {
                call.prog_code = Some(CODE_CCITT);
                call.prog_loc = Some(LOC_USER);
                call.progress = Some(PROG_CALLER_NOT_ISDN);
            } else {
                call.progress = None;
            }
        }
        self.q931_send_message(cref, MsgType::Setup, SETUP_IES)?;
        if let Some(call) = self.calls.find_mut(cref) {
            call.alive = true;
        }
        Ok(())
    }

    fn q931_release_complete(&mut self, cref: CallRef) -> PriResult<()> {
        self.q931_send_message(cref, MsgType::ReleaseComplete, RELEASE_COMPLETE_IES)
    }

    fn q931_connect_acknowledge(&mut self, cref: CallRef) -> PriResult<()> {
        self.q931_send_message(cref, MsgType::ConnectAcknowledge, CONNECT_ACK_IES)
    }

    fn q931_restart_ack(&mut self, cref: CallRef) -> PriResult<()> {
        self.q931_send_message(cref, MsgType::RestartAcknowledge, RESTART_ACK_IES)
    }

    fn q931_status(&mut self, cref: CallRef, cause: u8) -> PriResult<()> {
        {
            let call = self.calls.find_mut(cref).ok_or(PriError::UnknownCall)?;
            call.cause = Some(cause);
            call.cause_code = Some(CODE_CCITT);
            call.cause_loc = Some(LOC_PRIV_NET_LOCAL_USER);
        }
        self.q931_send_message(cref, MsgType::Status, STATUS_IES)
    }

    /// Restart a bearer channel via the global call reference.
    pub(crate) fn q931_restart(&mut self, channel: u8) -> PriResult<()> {
        let cref = CallRef::GLOBAL;
        {
            let call = self.calls.get_or_create(cref);
            call.channelno = Some(channel);
            call.chan_sel = ChanSel::Exclusive;
            call.restart = Some(0);
        }
        self.q931_send_message(cref, MsgType::Restart, RESTART_IES)
    }

    /// Send one overlap-dialing digit.
    pub(crate) fn q931_information(&mut self, cref: CallRef, digit: char) -> PriResult<()> {
        {
            let call = self.calls.find_mut(cref).ok_or(PriError::UnknownCall)?;
            call.called = digit.to_string();
        }
        self.q931_send_message(cref, MsgType::Information, INFORMATION_IES)
    }

    // ── Receiver ──────────────────────────────────────────────────

    /// Acknowledge a maintenance-dialect message by rebuilding it with
    /// the opcode lowered.
    fn q931_maintenance_ack(&mut self, payload: &[u8]) {
        let crlen = (payload[1] & 0x0f) as usize;
        let pos = 2 + crlen;
        let mut buf = payload.to_vec();
        buf[pos] = buf[pos].wrapping_sub(MAINT_ACK_DELTA);
        self.stats.q931_tx += 1;
        let _ = self.q921_transmit_iframe(&buf, true);
    }

    /// Process one delivered I-frame payload. At most one upward event
    /// is produced, through the controller's pending slot.
    pub(crate) fn q931_receive(&mut self, payload: &[u8]) {
        self.stats.q931_rx += 1;
        if self.debug.contains(DebugFlags::Q931_DUMP) {
            dump_message(payload, false);
        }
        let h = match msg::parse_header(payload) {
            Ok(h) => h,
            Err(e) => {
                pri_warn!("dropping message: {}", e);
                return;
            }
        };
        if h.pd == PD_MAINTENANCE {
            self.q931_maintenance_ack(payload);
            return;
        }
        if h.pd != PD_Q931 {
            pri_warn!("unhandled protocol discriminator {:#04x}, dropping", h.pd);
            return;
        }
        let mt = match MsgType::from_code(h.msg) {
            Some(m) => m,
            None => {
                pri_error!("don't know how to handle message type {:#04x}", h.msg);
                return;
            }
        };
        if self.debug.contains(DebugFlags::Q931_STATE) {
            pri_debug!("-- Processing {} for cref {}", mt.name(), h.cref);
        }
        let cref = h.cref;

        // Preliminary handling: clear whatever this message will refill
        {
            let call = self.calls.get_or_create(cref);
            match mt {
                MsgType::Restart => call.reset_channel(),
                MsgType::Setup => call.reset_setup(),
                MsgType::Connect | MsgType::Alerting | MsgType::Progress => call.progress = None,
                MsgType::Release | MsgType::Disconnect => call.reset_cause(),
                MsgType::ReleaseComplete | MsgType::Status => {
                    call.reset_cause();
                    call.peer_state = None;
                }
                MsgType::CallProceeding
                | MsgType::ConnectAcknowledge
                | MsgType::RestartAcknowledge
                | MsgType::StatusEnquiry
                | MsgType::Information => {}
            }
        }

        // IE processing
        let dialect = self.dialect;
        let mut x = h.ies_at;
        while x < payload.len() {
            let id = payload[x];
            if id & 0x80 != 0 {
                // Single-octet form (shift and friends): recognized and
                // skipped, never acted on
                x += 1;
                continue;
            }
            if x + 1 >= payload.len() {
                pri_warn!("message longer than it should be, dropping");
                return;
            }
            let len = payload[x + 1] as usize;
            if x + 2 + len > payload.len() {
                pri_warn!("message longer than it should be, dropping");
                return;
            }
            let content = &payload[x + 2..x + 2 + len];
            match ie_entry(id) {
                None => pri_warn!("unknown IE {:#04x}, skipping", id),
                Some(entry) => match entry.decode {
                    None => pri_warn!("no handler for IE {} ({:#04x}), skipping", entry.name, id),
                    Some(dec) => {
                        let call = self.calls.get_or_create(cref);
                        if let Err(e) = dec(call, dialect, mt, content) {
                            pri_warn!("dropping message: {}", e);
                            return;
                        }
                    }
                },
            }
            x += 2 + len;
        }

        self.q931_post_handle(cref, mt);
    }

    /// Act on a fully decoded message: auto-responses, events, teardown.
    fn q931_post_handle(&mut self, cref: CallRef, mt: MsgType) {
        match mt {
            MsgType::Restart => {
                let channel = self.calls.find(cref).and_then(|c| c.channelno);
                let _ = self.q931_restart_ack(cref);
                self.emit(PriEvent::Restart { channel });
            }
            MsgType::Setup => {
                let (ring, mode_ok) = match self.calls.find_mut(cref) {
                    Some(call) => {
                        call.alive = true;
                        let ring = RingEvent {
                            channel: call.channelno,
                            calling_pres: call.calling_pres,
                            calling_plan: call.calling_plan,
                            calling: call.calling.clone(),
                            called_plan: call.called_plan,
                            called: call.called.clone(),
                            flexible: call.chan_sel != ChanSel::Exclusive,
                            cref,
                            capability: call.cap,
                        };
                        (ring, call.mode == Some(TransferMode::Circuit64))
                    }
                    None => return,
                };
                if !mode_ok {
                    // Only 64k circuit bearers are carried
                    let _ = self.q931_release(cref, Some(CAUSE_BEARERCAPABILITY_NOTIMPL));
                    return;
                }
                self.emit(PriEvent::Ring(ring));
            }
            MsgType::Alerting => {
                let channel = self.calls.find(cref).and_then(|c| c.channelno);
                self.emit(PriEvent::Ringing { channel, cref });
            }
            MsgType::Connect => {
                let channel = self.calls.find(cref).and_then(|c| c.channelno);
                self.emit(PriEvent::Answer { channel, cref });
                let _ = self.q931_connect_acknowledge(cref);
            }
            MsgType::Disconnect => {
                let (channel, cause) = match self.calls.find(cref) {
                    Some(c) => (c.channelno, c.cause),
                    None => return,
                };
                // Clear our half; the peer's cause rides up in the event
                let _ = self.q931_release(cref, None);
                self.emit(PriEvent::Hangup { channel, cause, cref });
            }
            MsgType::Release => {
                let (alive, channel, cause) = match self.calls.find(cref) {
                    Some(c) => (c.alive, c.channelno, c.cause),
                    None => return,
                };
                if alive {
                    self.emit(PriEvent::Hangup { channel, cause, cref });
                }
                let _ = self.q931_release_complete(cref);
                self.calls.destroy(cref);
            }
            MsgType::ReleaseComplete => {
                let (alive, channel, cause) = match self.calls.find(cref) {
                    Some(c) => (c.alive, c.channelno, c.cause),
                    None => return,
                };
                if alive {
                    self.emit(PriEvent::Hangup { channel, cause, cref });
                }
                self.calls.destroy(cref);
            }
            MsgType::Status => {
                let cause = self.calls.find(cref).and_then(|c| c.cause);
                if cause != Some(CAUSE_INTERWORKING) {
                    pri_warn!(
                        "received unsolicited status: {}",
                        cause.map_or("no cause", cause_to_str)
                    );
                }
            }
            MsgType::StatusEnquiry => {
                let _ = self.q931_status(cref, CAUSE_RESPONSE_TO_STATUS_ENQUIRY);
            }
            MsgType::Progress
            | MsgType::CallProceeding
            | MsgType::ConnectAcknowledge
            | MsgType::RestartAcknowledge
            | MsgType::Information => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qpri_core::codes::PLAN_NATIONAL_ISDN;

    #[test]
    fn test_build_setup_message() {
        let mut call = Call::new(CallRef::new_local(1));
        call.cap = Some(TransferCap::Speech);
        call.mode = Some(TransferMode::Circuit64);
        call.userl1 = Some(LAYER1_ULAW);
        call.channelno = Some(3);
        call.chan_sel = ChanSel::Exclusive;
        call.calling_plan = Some(PLAN_NATIONAL_ISDN);
        call.calling_pres = Some(PRES_ALLOWED_USER_NOT_SCREENED);
        call.calling = "5551000".into();
        call.called_plan = Some(PLAN_NATIONAL_ISDN);
        call.called = "5552000".into();

        let buf = build_message(&call, Dialect::Ni2, MsgType::Setup, SETUP_IES).unwrap();
        // Header
        assert_eq!(&buf[..5], &[0x08, 0x02, 0x00, 0x01, 0x05]);
        // First IE is the bearer capability
        assert_eq!(buf[5], IE_BEARER_CAPABILITY);
        assert_eq!(buf[6] as usize, 3);
        // Progress is unset and therefore omitted entirely
        assert!(!buf.contains(&IE_PROGRESS_INDICATOR));
        // Called number rides at the tail: id, len, plan octet, digits
        let tail = &buf[buf.len() - 10..];
        assert_eq!(tail[0], IE_CALLED_PARTY_NUMBER);
        assert_eq!(tail[1], 8);
        assert_eq!(tail[2], 0x80 | PLAN_NATIONAL_ISDN);
        assert_eq!(&tail[3..], b"5552000");
    }

    #[test]
    fn test_build_release_without_cause() {
        let mut call = Call::new(CallRef::new_peer(2));
        call.cause = None;
        let buf = build_message(&call, Dialect::Ni2, MsgType::Release, RELEASE_IES).unwrap();
        // Just the header: the cause encoder omitted itself
        assert_eq!(buf.len(), 5);
        assert_eq!(buf[4], MsgType::Release.code());
    }

    #[test]
    fn test_build_status() {
        let mut call = Call::new(CallRef::new_peer(2));
        call.alive = true;
        call.cause = Some(CAUSE_RESPONSE_TO_STATUS_ENQUIRY);
        call.cause_code = Some(CODE_CCITT);
        call.cause_loc = Some(LOC_PRIV_NET_LOCAL_USER);
        let buf = build_message(&call, Dialect::Ni2, MsgType::Status, STATUS_IES).unwrap();
        assert_eq!(buf[5], IE_CAUSE);
        let cs_at = 5 + 2 + buf[6] as usize;
        assert_eq!(buf[cs_at], IE_CALL_STATE);
        assert_eq!(buf[cs_at + 2] & 0x3f, 0x0a); // active
    }
}
