//! Q.921 LAPD peer engine
//!
//! Point-to-point acknowledged mode on a fixed SAPI/TEI: SABME/UA link
//! bring-up, I-frame transfer with a mod-128 sliding window, RR handling,
//! T200 retransmission, T203 idle polling, disconnection.
//!
//! Frames arrive here with the FCS still counted in the length (the
//! framer has already verified it); the two tail bytes are discarded
//! before parsing. Out-of-sequence I-frames inside the forward window
//! are answered with an RR nudge; REJ is deliberately never emitted.

pub mod frame;
pub(crate) mod txq;

use qpri_core::{pri_debug, pri_error, pri_warn, DebugFlags, PriEvent, PriResult, Role};

use crate::controller::Pri;
use crate::io::FrameIo;
use crate::sched::TimerId;
use self::frame::{seq_inc, Address, Control, UFunc, FCS_LEN, SAPI_CALL_CTRL, S_RR, TEI_GROUP};
use self::txq::TxQueue;

/// Timer tokens dispatched by the controller pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerTag {
    Sabme,
    T200,
    T203,
}

/// Data link state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkState {
    Released,
    AwaitingEstablish,
    Established,
}

/// The Q.921 state block.
#[derive(Debug)]
pub(crate) struct Q921 {
    pub state: LinkState,
    /// Next N(S) for transmission
    pub v_s: u8,
    /// Last acknowledged frame
    pub v_a: u8,
    /// Next frame expected to be received
    pub v_r: u8,
    /// What we've told our peer we've acknowledged
    pub v_na: u8,
    /// Max window size
    pub window: u8,
    /// Peer is busy
    pub busy: bool,
    /// Reject state (retained for the state block; REJ is never sent)
    pub sent_rej: bool,
    /// Have we sent a frame soliciting an F bit?
    pub solicit_fbit: bool,
    /// Retransmissions of the queue head so far
    pub retrans: u32,
    pub sabme_timer: TimerId,
    pub t200_timer: TimerId,
    pub t203_timer: TimerId,
    pub txq: TxQueue,
}

impl Q921 {
    pub fn new() -> Self {
        Q921 {
            state: LinkState::Released,
            v_s: 0,
            v_a: 0,
            v_r: 0,
            v_na: 0,
            window: 7,
            busy: false,
            sent_rej: false,
            solicit_fbit: false,
            retrans: 0,
            sabme_timer: TimerId::NONE,
            t200_timer: TimerId::NONE,
            t203_timer: TimerId::NONE,
            txq: TxQueue::new(),
        }
    }
}

impl<F: FrameIo> Pri<F> {
    /// Write one prebuilt frame to the wire.
    pub(crate) fn q921_transmit(&mut self, buf: &[u8]) -> PriResult<()> {
        if self.debug.contains(DebugFlags::Q921_DUMP) {
            frame::dump(
                &buf[..buf.len() - FCS_LEN],
                self.debug.contains(DebugFlags::Q921_RAW),
                true,
            );
        }
        match self.io.send(buf) {
            Ok(()) => {
                self.stats.q921_tx += 1;
                Ok(())
            }
            Err(e) => {
                pri_error!("{}", e);
                Err(e)
            }
        }
    }

    fn q921_send_ua(&mut self, pf: bool) {
        let addr = Address::call_ctrl(self.role.response_cr());
        let buf = frame::build_u(addr, 3, 0, pf);
        if self.debug.contains(DebugFlags::Q921_STATE) {
            pri_debug!("Sending unnumbered acknowledgement");
        }
        let _ = self.q921_transmit(&buf);
    }

    pub(crate) fn q921_send_sabme(&mut self) {
        self.sched.cancel(self.q921.sabme_timer);
        self.q921.sabme_timer = self.arm(self.t200_ms, TimerTag::Sabme);
        let addr = Address::call_ctrl(self.role.command_cr());
        let buf = frame::build_u(addr, 3, 3, true);
        if self.debug.contains(DebugFlags::Q921_STATE) {
            pri_debug!("Sending SABME");
        }
        let _ = self.q921_transmit(&buf);
        self.q921.state = LinkState::AwaitingEstablish;
    }

    /// Send an RR carrying the current v(r); notes that the peer has now
    /// been acked through it.
    fn q921_send_rr(&mut self, pbit: bool) {
        let addr = Address::call_ctrl(self.role.response_cr());
        let buf = frame::build_s(addr, S_RR, self.q921.v_r, pbit);
        self.q921.v_na = self.q921.v_r;
        if self.debug.contains(DebugFlags::Q921_STATE) {
            pri_debug!("Sending receiver ready ({})", self.q921.v_r);
        }
        let _ = self.q921_transmit(&buf);
    }

    /// Process an inbound N(R) acknowledgement.
    fn q921_ack_rx(&mut self, nr: u8) {
        // The ACK must lie within [v_a, v_s]
        let mut x = self.q921.v_a;
        while x != self.q921.v_s && x != nr {
            x = seq_inc(x);
        }
        if x != nr {
            pri_warn!("ACK received outside of window, ignoring");
            return;
        }
        let cnt = self.q921.txq.ack_to(self.q921.v_a, nr);
        self.q921.v_a = nr;
        if cnt > 0 {
            // Progress was made; recovery starts over
            self.q921.retrans = 0;
            if self.debug.contains(DebugFlags::Q921_STATE) {
                pri_debug!("-- Something was acked, stopping T200");
            }
            self.sched.cancel(self.q921.t200_timer);
            self.q921.t200_timer = TimerId::NONE;
        }
        if !self.q921.t203_timer.is_none() {
            self.sched.cancel(self.q921.t203_timer);
            self.q921.t203_timer = TimerId::NONE;
        }
        if !self.q921.txq.is_empty() {
            if self.q921.t200_timer.is_none() {
                self.q921.t200_timer = self.arm(self.t200_ms, TimerTag::T200);
            }
        } else {
            self.q921.t203_timer = self.arm(self.t203_ms, TimerTag::T203);
        }
    }

    /// Enqueue a Layer 3 payload as an I-frame and transmit it. `cr`
    /// selects command vs response direction.
    pub(crate) fn q921_transmit_iframe(&mut self, payload: &[u8], cr: bool) -> PriResult<()> {
        let addr = Address::call_ctrl(if cr {
            self.role.command_cr()
        } else {
            self.role.response_cr()
        });
        let ns = self.q921.v_s;
        let buf = frame::build_i(addr, ns, self.q921.v_r, false, payload);
        self.q921.v_s = seq_inc(ns);
        self.q921.v_na = self.q921.v_r;
        self.q921.txq.push(ns, buf.clone());

        // Transmit immediately unless we are in recovery; the head will
        // go out again from T200 in that case.
        let res = if self.q921.retrans == 0 {
            self.q921_transmit(&buf)
        } else {
            Ok(())
        };

        if !self.q921.t203_timer.is_none() {
            self.sched.cancel(self.q921.t203_timer);
            self.q921.t203_timer = TimerId::NONE;
        }
        if self.q921.t200_timer.is_none() {
            if self.debug.contains(DebugFlags::Q921_STATE) {
                pri_debug!("Starting T200");
            }
            self.q921.t200_timer = self.arm(self.t200_ms, TimerTag::T200);
        }
        res
    }

    pub(crate) fn q921_t200_expire(&mut self) {
        self.q921.t200_timer = TimerId::NONE;
        let v_r = self.q921.v_r;
        let head = self.q921.txq.head_mut().map(|h| {
            frame::repoll_i(&mut h.buf, v_r);
            h.buf.clone()
        });
        if let Some(buf) = head {
            if self.debug.contains(DebugFlags::Q921_STATE) {
                pri_debug!(
                    "T200 expired, retransmitting head (retrans so far = {})",
                    self.q921.retrans
                );
            }
            self.q921.v_na = v_r;
            self.q921.solicit_fbit = true;
            self.q921.retrans += 1;
            let _ = self.q921_transmit(&buf);
            self.q921.t200_timer = self.arm(self.t200_ms, TimerTag::T200);
        } else if self.q921.solicit_fbit {
            // Still waiting on a poll response; ask again
            self.q921_send_rr(true);
            self.q921.t200_timer = self.arm(self.t200_ms, TimerTag::T200);
        } else {
            pri_error!("T200 expired with nothing outstanding");
        }
    }

    pub(crate) fn q921_t203_expire(&mut self) {
        if self.debug.contains(DebugFlags::Q921_STATE) {
            pri_debug!("T203 expired, polling peer");
        }
        // Solicit an F bit in the peer's RR
        self.q921.solicit_fbit = true;
        self.q921_send_rr(true);
        self.q921.t203_timer = self.arm(self.t203_ms, TimerTag::T203);
    }

    pub(crate) fn q921_sabme_expire(&mut self) {
        self.q921.sabme_timer = TimerId::NONE;
        self.q921_send_sabme();
    }

    fn q921_handle_iframe(&mut self, ns: u8, nr: u8, p: bool, payload: &[u8]) {
        if ns == self.q921.v_r {
            self.q921.v_r = seq_inc(self.q921.v_r);
            self.q921_ack_rx(nr);
            if p {
                // Poll demands an immediate final
                self.q921_send_rr(true);
            }
            self.q931_receive(payload);
            // Ack with an RR if the delivery path didn't already
            if self.q921.v_na != self.q921.v_r {
                self.q921_send_rr(false);
            }
        } else {
            let dist = ns.wrapping_sub(self.q921.v_r) & 0x7f;
            if dist >= 1 && dist < self.q921.window {
                // Inside the forward window; nudge the sender back into
                // sequence
                self.q921_send_rr(false);
            } else {
                pri_warn!(
                    "cannot accept I-frame (expected {}, got {}), dropping",
                    self.q921.v_r,
                    ns
                );
            }
        }
    }

    fn q921_handle_uframe(&mut self, func: UFunc, cr: bool, pf: bool) {
        match func {
            UFunc::Sabme => {
                let remote = if cr { Role::Network } else { Role::Cpe };
                self.remote_role = Some(remote);
                if self.debug.contains(DebugFlags::Q921_STATE) {
                    pri_debug!("-- Got SABME from {} peer", remote);
                }
                if remote == self.role {
                    let err = match self.role {
                        Role::Network => {
                            "We think we're the network, but they think they're the network, too."
                        }
                        Role::Cpe => "We think we're the CPE, but they think they're the CPE, too.",
                    };
                    self.emit(PriEvent::ConfigError { err: err.to_string() });
                    return;
                }
                self.q921_send_ua(pf);
                self.q921_dchannel_up();
            }
            UFunc::Ua => {
                if self.q921.state == LinkState::AwaitingEstablish {
                    if self.debug.contains(DebugFlags::Q921_STATE) {
                        pri_debug!("-- Got UA from peer, link up");
                    }
                    self.q921_dchannel_up();
                } else {
                    pri_warn!("got UA in state {:?}", self.q921.state);
                }
            }
            UFunc::Dm => {
                if pf {
                    if self.q921.state != LinkState::Released {
                        if self.debug.contains(DebugFlags::Q921_STATE) {
                            pri_debug!("-- Got DM from peer");
                        }
                        self.q921_dchannel_down();
                    }
                } else {
                    // Peer asks us to establish
                    if self.debug.contains(DebugFlags::Q921_STATE) {
                        pri_debug!("-- DM requesting SABME, starting");
                    }
                    self.q921_start();
                }
            }
            UFunc::Disc => {
                if self.debug.contains(DebugFlags::Q921_STATE) {
                    pri_debug!("-- Got DISC from peer");
                }
                self.q921_send_ua(pf);
                self.q921_dchannel_down();
            }
            UFunc::Ui => pri_warn!("unnumbered information not implemented"),
            UFunc::Frmr => pri_warn!("frame reject received, ignoring"),
            UFunc::Xid => pri_warn!("XID frames not supported"),
            UFunc::Unknown => pri_warn!("unclassifiable U-frame, ignoring"),
        }
    }

    /// Entry point for one inbound frame; the length still counts the
    /// two FCS octets.
    pub(crate) fn q921_receive(&mut self, raw: &[u8]) {
        if raw.len() < FCS_LEN + 3 {
            pri_warn!("received short frame ({} bytes)", raw.len());
            return;
        }
        let buf = &raw[..raw.len() - FCS_LEN];
        self.stats.q921_rx += 1;
        if self.debug.contains(DebugFlags::Q921_DUMP) {
            frame::dump(buf, self.debug.contains(DebugFlags::Q921_RAW), false);
        }
        let f = match frame::parse(buf) {
            Ok(f) => f,
            Err(e) => {
                pri_debug!("dropping frame: {}", e);
                return;
            }
        };
        // Broadcasts and foreign SAPIs are not ours
        if f.addr.tei == TEI_GROUP || f.addr.sapi != SAPI_CALL_CTRL {
            return;
        }
        match f.ctrl {
            Control::I { ns, nr, p } => {
                if self.q921.state != LinkState::Established {
                    pri_warn!("got I-frame while link state {:?}", self.q921.state);
                    return;
                }
                self.q921_handle_iframe(ns, nr, p, f.payload);
            }
            Control::S { ss, nr, pf } => {
                if self.q921.state != LinkState::Established {
                    pri_warn!("got S-frame while link down");
                    return;
                }
                match ss {
                    S_RR => {
                        self.q921.busy = false;
                        self.q921_ack_rx(nr);
                        if pf {
                            if self.q921.solicit_fbit {
                                if self.debug.contains(DebugFlags::Q921_STATE) {
                                    pri_debug!("-- Got RR response to our poll");
                                }
                            } else {
                                if self.debug.contains(DebugFlags::Q921_STATE) {
                                    pri_debug!("-- Unsolicited RR with P/F bit, responding");
                                }
                                self.q921_send_rr(true);
                            }
                            self.q921.solicit_fbit = false;
                        }
                    }
                    _ => pri_warn!("unhandled supervisory frame ss={}", ss),
                }
            }
            Control::U { pf, .. } => {
                if let Some(func) = f.ctrl.ufunc() {
                    self.q921_handle_uframe(func, f.addr.cr, pf);
                }
            }
        }
    }

    /// Reset all Layer 2 state: counters, timers, transmit queue.
    pub(crate) fn q921_reset(&mut self) {
        self.q921.v_s = 0;
        self.q921.v_a = 0;
        self.q921.v_r = 0;
        self.q921.v_na = 0;
        self.q921.window = 7;
        self.q921.busy = false;
        self.q921.sent_rej = false;
        self.q921.solicit_fbit = false;
        self.q921.retrans = 0;
        self.sched.cancel(self.q921.sabme_timer);
        self.sched.cancel(self.q921.t200_timer);
        self.sched.cancel(self.q921.t203_timer);
        self.q921.sabme_timer = TimerId::NONE;
        self.q921.t200_timer = TimerId::NONE;
        self.q921.t203_timer = TimerId::NONE;
        self.q921.state = LinkState::Released;
        self.q921.txq.clear();
    }

    fn q921_dchannel_up(&mut self) {
        // A fresh link means fresh sequence state
        self.q921_reset();
        self.q921.state = LinkState::Established;
        self.q921.t203_timer = self.arm(self.t203_ms, TimerTag::T203);
        self.emit(PriEvent::DchanUp);
    }

    fn q921_dchannel_down(&mut self) {
        self.q921_reset();
        self.emit(PriEvent::DchanDown);
    }

    /// Begin link establishment from the released state.
    pub(crate) fn q921_start(&mut self) {
        if self.q921.state != LinkState::Released {
            pri_warn!("q921_start: not in released state");
            return;
        }
        self.q921_reset();
        self.q921_send_sabme();
    }
}
