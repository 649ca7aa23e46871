//! Millisecond timer scheduler
//!
//! A sparse slot array of (deadline, token) pairs. Timers carry a typed
//! token rather than a callback; the controller dispatches expired tokens
//! itself, so the scheduler never holds references into the rest of the
//! stack and a call can be destroyed without dangling a timer.
//!
//! Slot ids are stable and 1-based; id 0 is the "not armed" sentinel and
//! `cancel` ignores it silently. Stale ids (slot already fired or
//! cancelled) are tolerated.
//!
//! Single-threaded and non-reentrant: a dispatched token handler may
//! schedule or cancel, but must not pump the scheduler recursively.

use std::time::{Duration, Instant};

use qpri_core::{pri_error, PriError, PriResult};

/// Initial number of scheduled timer slots.
pub const SCHED_SLOTS_INITIAL: usize = 128;

/// Maximum number of scheduled timer slots; a power-of-2 multiple of
/// `SCHED_SLOTS_INITIAL`.
pub const SCHED_SLOTS_MAX: usize = 8192;

/// Stable handle for a scheduled timer. `TimerId::NONE` (0) means
/// "not armed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(usize);

impl TimerId {
    pub const NONE: TimerId = TimerId(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

struct Slot<T> {
    when: Instant,
    token: T,
}

/// The scheduler. `T` is the token type dispatched on expiry.
pub struct Sched<T> {
    slots: Vec<Option<Slot<T>>>,
    /// High-water mark: every slot at this index and above is vacant
    max_used: usize,
}

impl<T> Sched<T> {
    pub fn new() -> Self {
        Sched { slots: Vec::new(), max_used: 0 }
    }

    fn grow(&mut self) -> PriResult<()> {
        let num_slots = if self.slots.is_empty() {
            SCHED_SLOTS_INITIAL
        } else {
            if self.slots.len() >= SCHED_SLOTS_MAX {
                return Err(PriError::SchedFull);
            }
            (self.slots.len() * 2).min(SCHED_SLOTS_MAX)
        };
        self.slots.resize_with(num_slots, || None);
        Ok(())
    }

    /// Arm a timer `ms` milliseconds after `now`. Returns a stable
    /// 1-based id.
    pub fn schedule(&mut self, now: Instant, ms: u64, token: T) -> PriResult<TimerId> {
        let mut x = self.max_used;
        for i in 0..self.max_used {
            if self.slots[i].is_none() {
                x = i;
                break;
            }
        }
        if x == self.slots.len() {
            self.grow()?;
        }
        self.slots[x] = Some(Slot { when: now + Duration::from_millis(ms), token });
        if self.max_used <= x {
            self.max_used = x + 1;
        }
        Ok(TimerId(x + 1))
    }

    /// Disarm a timer. Id 0 and stale ids are ignored.
    pub fn cancel(&mut self, id: TimerId) {
        if id.0 == 0 {
            return;
        }
        if id.0 <= self.slots.len() {
            self.slots[id.0 - 1] = None;
        } else {
            pri_error!("asked to delete sched id {} with {} slots", id.0, self.slots.len());
        }
    }

    /// Earliest deadline among armed timers. Scans backwards from the
    /// high-water mark and lowers it past trailing vacancies.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        let mut closest: Option<Instant> = None;
        let mut x = self.max_used;
        while x > 0 {
            x -= 1;
            if let Some(slot) = &self.slots[x] {
                match closest {
                    None => {
                        // Highest armed slot; pull the mark down to it.
                        closest = Some(slot.when);
                        self.max_used = x + 1;
                    }
                    Some(c) if slot.when < c => closest = Some(slot.when),
                    _ => {}
                }
            }
        }
        if closest.is_none() {
            self.max_used = 0;
        }
        closest
    }

    /// Clear and return one expired slot, in slot order. The caller
    /// dispatches the token and decides whether to keep pumping.
    pub fn take_expired(&mut self, now: Instant) -> Option<T> {
        for x in 0..self.max_used {
            if let Some(slot) = &self.slots[x] {
                if slot.when <= now {
                    return self.slots[x].take().map(|s| s.token);
                }
            }
        }
        None
    }

    /// Number of armed timers.
    pub fn active(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.active() == 0
    }
}

impl<T> Default for Sched<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_expire() {
        let mut s: Sched<u32> = Sched::new();
        let now = Instant::now();

        let id = s.schedule(now, 100, 7).unwrap();
        assert!(!id.is_none());
        assert_eq!(s.active(), 1);

        // Not yet due
        assert!(s.take_expired(now).is_none());

        // Due
        assert_eq!(s.take_expired(now + Duration::from_millis(150)), Some(7));
        assert_eq!(s.active(), 0);
    }

    #[test]
    fn test_cancel() {
        let mut s: Sched<u32> = Sched::new();
        let now = Instant::now();

        let id = s.schedule(now, 10, 1).unwrap();
        s.cancel(id);
        assert!(s.take_expired(now + Duration::from_secs(1)).is_none());

        // Sentinel and stale ids are silent
        s.cancel(TimerId::NONE);
        s.cancel(id);
    }

    #[test]
    fn test_ids_one_based_and_reused() {
        let mut s: Sched<u32> = Sched::new();
        let now = Instant::now();

        let a = s.schedule(now, 10, 1).unwrap();
        let b = s.schedule(now, 10, 2).unwrap();
        assert_eq!(a, TimerId(1));
        assert_eq!(b, TimerId(2));

        s.cancel(a);
        let c = s.schedule(now, 10, 3).unwrap();
        assert_eq!(c, TimerId(1)); // freed slot reused
    }

    #[test]
    fn test_next_deadline() {
        let mut s: Sched<u32> = Sched::new();
        let now = Instant::now();

        assert!(s.next_deadline().is_none());

        s.schedule(now, 500, 1).unwrap();
        let id = s.schedule(now, 100, 2).unwrap();
        s.schedule(now, 900, 3).unwrap();

        let d = s.next_deadline().unwrap();
        assert_eq!(d, now + Duration::from_millis(100));

        s.cancel(id);
        let d = s.next_deadline().unwrap();
        assert_eq!(d, now + Duration::from_millis(500));
    }

    #[test]
    fn test_high_water_mark_recedes() {
        let mut s: Sched<u32> = Sched::new();
        let now = Instant::now();

        let ids: Vec<_> = (0..10).map(|i| s.schedule(now, 10, i).unwrap()).collect();
        for id in &ids[1..] {
            s.cancel(*id);
        }
        // Scan pulls the mark down to the single survivor.
        assert!(s.next_deadline().is_some());
        assert_eq!(s.max_used, 1);

        s.cancel(ids[0]);
        assert!(s.next_deadline().is_none());
        assert_eq!(s.max_used, 0);
    }

    #[test]
    fn test_grow_to_bound() {
        let mut s: Sched<usize> = Sched::new();
        let now = Instant::now();

        for i in 0..SCHED_SLOTS_MAX {
            s.schedule(now, 1000, i).unwrap();
        }
        assert_eq!(s.active(), SCHED_SLOTS_MAX);
        assert_eq!(s.schedule(now, 1000, 0), Err(PriError::SchedFull));
    }

    #[test]
    fn test_expiry_clears_before_dispatch() {
        let mut s: Sched<u32> = Sched::new();
        let now = Instant::now();

        s.schedule(now, 0, 1).unwrap();
        s.schedule(now, 0, 2).unwrap();

        let later = now + Duration::from_millis(1);
        let first = s.take_expired(later).unwrap();
        // Rearming from a handler must not resurrect the fired slot.
        s.schedule(later, 1000, 10 + first).unwrap();
        let second = s.take_expired(later).unwrap();
        assert_ne!(first, second);
        assert!(s.take_expired(later).is_none());
        assert_eq!(s.active(), 1);
    }
}
