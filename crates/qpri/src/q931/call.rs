//! Call records and the call directory
//!
//! One record per active call reference, held in insertion order. The
//! receive path creates records on a miss (an unknown inbound reference
//! implies a new call); `alloc_new` hands out local references from the
//! wrapping 15-bit counter. Records are destroyed only from Layer 3
//! handlers, never from timer dispatch.

use qpri_core::{pri_debug, pri_error, CallRef, TransferCap, TransferMode};

/// Longest number string we will store or emit.
pub(crate) const MAX_NUMBER_LEN: usize = 255;

/// Channel selection mode from/for the channel identification IE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ChanSel {
    /// Nothing retrieved yet
    #[default]
    None,
    Preferred,
    Exclusive,
}

/// Per-call state. Which Q.931 messages have been sent and received is
/// implied by the field values rather than a single state enum.
#[derive(Debug, Default)]
pub(crate) struct Call {
    pub cref: CallRef,
    pub alive: bool,
    /// CALL PROCEEDING already sent for this call
    pub proceeding_sent: bool,

    // Channel selection
    pub channelno: Option<u8>,
    pub ds1no: Option<u8>,
    /// Bitmap of channels 24..1
    pub slotmap: Option<u32>,
    pub chan_sel: ChanSel,

    // Bearer capability
    pub cap: Option<TransferCap>,
    pub mode: Option<TransferMode>,
    pub multiplier: Option<u8>,
    pub userl1: Option<u8>,
    pub userl2: Option<u8>,
    pub userl3: Option<u8>,
    pub rate_adaption: Option<u8>,
    pub non_isdn: bool,

    // Progress indicator
    pub prog_code: Option<u8>,
    pub prog_loc: Option<u8>,
    pub progress: Option<u8>,

    // Cause
    pub cause_code: Option<u8>,
    pub cause_loc: Option<u8>,
    pub cause: Option<u8>,
    /// Diagnostic bytes retained but not interpreted
    pub cause_diag: Vec<u8>,

    // Peer-reported call state
    pub peer_state: Option<u8>,

    // Calling party
    pub calling_plan: Option<u8>,
    pub calling_pres: Option<u8>,
    pub calling: String,

    // Called party
    pub called_plan: Option<u8>,
    pub called: String,

    // Redirecting number, when the peer supplied one
    pub redirect_plan: Option<u8>,
    pub redirect_pres: Option<u8>,
    pub redirect_reason: Option<u8>,
    pub redirect: String,

    // Restart indicator class
    pub restart: Option<u8>,
}

impl Call {
    pub fn new(cref: CallRef) -> Self {
        Call { cref, ..Default::default() }
    }

    /// Clear the channel-selection fields (RESTART preamble).
    pub fn reset_channel(&mut self) {
        self.channelno = None;
        self.ds1no = None;
        self.slotmap = None;
        self.chan_sel = ChanSel::None;
        self.restart = None;
    }

    /// Clear everything a SETUP will re-populate.
    pub fn reset_setup(&mut self) {
        self.reset_channel();
        self.cap = None;
        self.mode = None;
        self.multiplier = None;
        self.userl1 = None;
        self.userl2 = None;
        self.userl3 = None;
        self.rate_adaption = None;
        self.calling_plan = None;
        self.calling_pres = None;
        self.calling.clear();
        self.called_plan = None;
        self.called.clear();
        self.redirect_plan = None;
        self.redirect_pres = None;
        self.redirect_reason = None;
        self.redirect.clear();
    }

    /// Clear cause fields before a clearing message refills them.
    pub fn reset_cause(&mut self) {
        self.cause = None;
        self.cause_code = None;
        self.cause_loc = None;
        self.cause_diag.clear();
    }
}

/// Insertion-ordered directory of live calls plus the local reference
/// allocator.
#[derive(Debug)]
pub(crate) struct CallDirectory {
    calls: Vec<Call>,
    /// Next local call reference to try, in [1, 32767]
    next_cref: u16,
}

impl CallDirectory {
    pub fn new() -> Self {
        CallDirectory { calls: Vec::new(), next_cref: 1 }
    }

    pub fn find(&self, cref: CallRef) -> Option<&Call> {
        self.calls.iter().find(|c| c.cref == cref)
    }

    pub fn find_mut(&mut self, cref: CallRef) -> Option<&mut Call> {
        self.calls.iter_mut().find(|c| c.cref == cref)
    }

    /// Look a reference up, creating a fresh record on a miss.
    pub fn get_or_create(&mut self, cref: CallRef) -> &mut Call {
        if let Some(pos) = self.calls.iter().position(|c| c.cref == cref) {
            return &mut self.calls[pos];
        }
        pri_debug!("-- Making new call for cref {}", cref);
        self.calls.push(Call::new(cref));
        self.calls.last_mut().unwrap()
    }

    /// Allocate an unused local call reference and create its record.
    pub fn alloc_new(&mut self) -> CallRef {
        loop {
            let candidate = CallRef::new_local(self.next_cref);
            self.next_cref = if self.next_cref >= 32767 { 1 } else { self.next_cref + 1 };
            if self.find(candidate).is_none() {
                self.calls.push(Call::new(candidate));
                return candidate;
            }
        }
    }

    /// Unlink and drop a call record.
    pub fn destroy(&mut self, cref: CallRef) {
        match self.calls.iter().position(|c| c.cref == cref) {
            Some(pos) => {
                self.calls.remove(pos);
            }
            None => pri_error!("can't destroy call {}", cref),
        }
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create() {
        let mut dir = CallDirectory::new();
        let cref = CallRef::new_peer(1);

        assert!(dir.find(cref).is_none());
        dir.get_or_create(cref).channelno = Some(3);
        assert_eq!(dir.len(), 1);
        // Same reference resolves to the same record
        assert_eq!(dir.get_or_create(cref).channelno, Some(3));
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn test_alloc_starts_at_one() {
        let mut dir = CallDirectory::new();
        let a = dir.alloc_new();
        let b = dir.alloc_new();
        assert_eq!(a, CallRef::new_local(1));
        assert_eq!(b, CallRef::new_local(2));
        assert!(a.is_local() && b.is_local());
    }

    #[test]
    fn test_alloc_skips_collisions() {
        let mut dir = CallDirectory::new();
        let a = dir.alloc_new();
        let b = dir.alloc_new();
        dir.destroy(a);
        // Counter keeps climbing; the freed value is not handed out until
        // it wraps back around.
        let c = dir.alloc_new();
        assert_eq!(c, CallRef::new_local(3));
        assert_ne!(c, b);
    }

    #[test]
    fn test_alloc_distinct_until_exhausted() {
        let mut dir = CallDirectory::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(dir.alloc_new()));
        }
    }

    #[test]
    fn test_wrap() {
        let mut dir = CallDirectory::new();
        dir.next_cref = 32767;
        let a = dir.alloc_new();
        assert_eq!(a, CallRef::new_local(32767));
        let b = dir.alloc_new();
        assert_eq!(b, CallRef::new_local(1));
    }

    #[test]
    fn test_destroy_unknown_is_noop() {
        let mut dir = CallDirectory::new();
        dir.destroy(CallRef::new_peer(9));
        assert!(dir.is_empty());
    }

    #[test]
    fn test_local_and_peer_side_coexist() {
        let mut dir = CallDirectory::new();
        let local = dir.alloc_new();
        let peer = CallRef::new_peer(local.value());
        dir.get_or_create(peer);
        assert_eq!(dir.len(), 2);
        dir.destroy(local);
        assert!(dir.find(peer).is_some());
    }
}
