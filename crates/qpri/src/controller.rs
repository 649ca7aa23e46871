//! The D-channel controller
//!
//! One `Pri` owns everything a D-channel needs: the framer I/O, the
//! Layer 2 state block, the call directory, the timer scheduler and the
//! pending event slot. It is single-threaded and not re-entrant; use one
//! controller per thread and consume each returned event before the next
//! pump call.
//!
//! The pump has an explicit-clock variant (`schedule_run_at`) so an
//! embedding event loop, or a test, can drive timers off its own notion
//! of now.

use std::time::Instant;

use qpri_core::cause::CAUSE_NORMAL_CLEARING;
use qpri_core::{pri_warn, CallRef, DebugFlags, Dialect, PriEvent, PriResult, Role};

use crate::config::PriConfig;
use crate::io::FrameIo;
use crate::q921::{LinkState, Q921, TimerTag};
use crate::q931::call::CallDirectory;
use crate::q931::SetupRequest;
use crate::sched::{Sched, TimerId};

/// Read buffer sized to the largest frame a D-channel produces.
const RX_BUF_LEN: usize = 1024;

/// Frame and message counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriStats {
    /// Layer 2 frames written
    pub q921_tx: u64,
    /// Layer 2 frames accepted
    pub q921_rx: u64,
    /// Layer 3 messages sent
    pub q931_tx: u64,
    /// Layer 3 messages delivered
    pub q931_rx: u64,
}

/// A D-channel controller.
pub struct Pri<F: FrameIo> {
    pub(crate) io: F,
    pub(crate) role: Role,
    pub(crate) remote_role: Option<Role>,
    pub(crate) dialect: Dialect,
    pub(crate) debug: DebugFlags,
    pub(crate) t200_ms: u64,
    pub(crate) t203_ms: u64,
    /// Time of the current pump pass; timers are armed relative to it
    pub(crate) clock: Instant,
    pub(crate) sched: Sched<TimerTag>,
    pub(crate) q921: Q921,
    pub(crate) calls: CallDirectory,
    /// The single upward event slot return paths fill in
    pub(crate) pending: Option<PriEvent>,
    pub(crate) stats: PriStats,
}

impl<F: FrameIo> Pri<F> {
    /// Create a controller and immediately start Layer 2 establishment.
    ///
    /// The framer must deliver whole frames on a non-blocking channel
    /// with the FCS verified; see `FrameIo`.
    pub fn new(io: F, role: Role, dialect: Dialect) -> Self {
        Self::with_config(io, PriConfig::new(role, dialect))
    }

    pub fn with_config(io: F, config: PriConfig) -> Self {
        let mut pri = Pri {
            io,
            role: config.role,
            remote_role: None,
            dialect: config.dialect,
            debug: config.debug,
            t200_ms: config.t200_ms,
            t203_ms: config.t203_ms,
            clock: Instant::now(),
            sched: Sched::new(),
            q921: Q921::new(),
            calls: CallDirectory::new(),
            pending: None,
            stats: PriStats::default(),
        };
        pri.q921_start();
        pri
    }

    // ── Accessors ─────────────────────────────────────────────────

    pub fn role(&self) -> Role {
        self.role
    }

    /// Role the peer claimed in its last SABME, if it spoke yet.
    pub fn remote_role(&self) -> Option<Role> {
        self.remote_role
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn set_debug(&mut self, flags: DebugFlags) {
        self.debug = flags;
    }

    pub fn stats(&self) -> PriStats {
        self.stats
    }

    /// True once the data link is established.
    pub fn is_established(&self) -> bool {
        self.q921.state == LinkState::Established
    }

    /// Number of armed timers (diagnostic).
    pub fn active_timers(&self) -> usize {
        self.sched.active()
    }

    /// Retransmissions of the current queue head (diagnostic).
    pub fn retrans_count(&self) -> u32 {
        self.q921.retrans
    }

    /// Number of live call records.
    pub fn num_calls(&self) -> usize {
        self.calls.len()
    }

    // ── Internal plumbing ─────────────────────────────────────────

    /// Fill the pending event slot. Return paths deliver it; at most one
    /// event is produced per pump call.
    pub(crate) fn emit(&mut self, ev: PriEvent) {
        if self.pending.is_some() {
            pri_warn!("overwriting undelivered event");
        }
        self.pending = Some(ev);
    }

    /// Arm a timer relative to the current pump clock. Scheduler
    /// exhaustion degrades to "not armed" with an error log.
    pub(crate) fn arm(&mut self, ms: u64, tag: TimerTag) -> TimerId {
        match self.sched.schedule(self.clock, ms, tag) {
            Ok(id) => id,
            Err(e) => {
                qpri_core::pri_error!("{}", e);
                TimerId::NONE
            }
        }
    }

    // ── Event pump ────────────────────────────────────────────────

    /// One non-blocking read attempt; parses at most one frame.
    pub fn check_event(&mut self) -> PriResult<Option<PriEvent>> {
        self.clock = Instant::now();
        let mut buf = [0u8; RX_BUF_LEN];
        match self.io.recv(&mut buf)? {
            None => Ok(None),
            Some(n) => {
                self.q921_receive(&buf[..n]);
                Ok(self.pending.take())
            }
        }
    }

    /// Run the D-channel. Non-blocking mode makes one read attempt;
    /// blocking mode waits on the channel with a timeout equal to the
    /// next timer deadline until an event is produced.
    pub fn run(&mut self, block: bool) -> PriResult<Option<PriEvent>> {
        if !block {
            return self.check_event();
        }
        loop {
            let timeout = self
                .sched
                .next_deadline()
                .map(|d| d.saturating_duration_since(Instant::now()));
            let readable = self.io.wait(timeout)?;
            let ev = if readable {
                self.check_event()?
            } else {
                self.schedule_run()
            };
            if let Some(ev) = ev {
                return Ok(Some(ev));
            }
        }
    }

    /// When the next timer fires; the embedding event loop's poll
    /// timeout.
    pub fn schedule_next(&mut self) -> Option<Instant> {
        self.sched.next_deadline()
    }

    /// Fire timers due now. Returns as soon as one produces an event.
    pub fn schedule_run(&mut self) -> Option<PriEvent> {
        self.schedule_run_at(Instant::now())
    }

    /// Explicit-clock variant of `schedule_run`: fires every timer whose
    /// deadline is at or before `now`, rearming relative to `now`.
    pub fn schedule_run_at(&mut self, now: Instant) -> Option<PriEvent> {
        self.clock = now;
        while let Some(tag) = self.sched.take_expired(now) {
            match tag {
                TimerTag::Sabme => self.q921_sabme_expire(),
                TimerTag::T200 => self.q921_t200_expire(),
                TimerTag::T203 => self.q921_t203_expire(),
            }
            if self.pending.is_some() {
                return self.pending.take();
            }
        }
        None
    }

    // ── Call operations ───────────────────────────────────────────

    /// Allocate a call record for an outgoing call.
    pub fn new_call(&mut self) -> CallRef {
        self.calls.alloc_new()
    }

    /// Place an outgoing call on a previously allocated reference.
    pub fn setup(&mut self, cref: CallRef, req: &SetupRequest) -> PriResult<()> {
        self.q931_setup(cref, req)
    }

    /// Acknowledge an incoming call and place it on `channel`: CALL
    /// PROCEEDING (first time) followed by ALERTING. `info` announces
    /// in-band information on the channel.
    pub fn acknowledge(&mut self, cref: CallRef, channel: Option<u8>, info: bool) -> PriResult<()> {
        self.q931_alerting(cref, channel, info)
    }

    /// Answer an incoming call. `non_isdn` marks the terminating
    /// equipment as non-ISDN.
    pub fn answer(&mut self, cref: CallRef, channel: Option<u8>, non_isdn: bool) -> PriResult<()> {
        self.q931_connect(cref, channel, non_isdn)
    }

    /// Hang up a call. `None` means normal clearing.
    pub fn hangup(&mut self, cref: CallRef, cause: Option<u8>) -> PriResult<()> {
        self.q931_disconnect(cref, Some(cause.unwrap_or(CAUSE_NORMAL_CLEARING)))
    }

    /// Send one overlap-dialing digit on an established call setup.
    pub fn information(&mut self, cref: CallRef, digit: char) -> PriResult<()> {
        self.q931_information(cref, digit)
    }

    /// Restart a bearer channel.
    pub fn reset(&mut self, channel: u8) -> PriResult<()> {
        self.q931_restart(channel)
    }
}
