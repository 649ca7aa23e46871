//! # qpri
//!
//! A user-space ISDN PRI signaling stack riding on a single D-channel.
//! Terminates Layer 2 (Q.921 LAPD) and Layer 3 (Q.931 call control) and
//! hands upward call events (ring, answer, hangup, restart) to an
//! embedding application that owns the bearer channels.
//!
//! # Architecture
//!
//! ```text
//!             application
//!                  ▲ PriEvent           ▼ new_call/answer/hangup/...
//!           ┌──────────────────────────────────────┐
//!           │           Pri (controller)           │
//!           │  scheduler ── Q.931 engine ── calls  │
//!           │      │             │                 │
//!           │      └──── Q.921 engine ── txqueue   │
//!           └──────────────────┬───────────────────┘
//!                              │ FrameIo
//!                   HDLC framer / D-channel fd
//! ```
//!
//! Inbound: fd -> framer -> Q.921 engine (timers, window) -> delivered
//! I-frame payload -> Q.931 driver -> IE decode -> call engine -> one
//! event per pump call. Outbound: call engine builds a message through
//! the IE encoders, the Q.921 engine wraps it into an I-frame and writes
//! it to the wire.
//!
//! The stack is single-threaded and cooperative; the only suspension
//! point is `Pri::run(true)`, which waits on the D-channel fd with a
//! timeout equal to the next timer deadline.
//!
//! ```ignore
//! use qpri::{Pri, FdIo};
//! use qpri::{Role, Dialect};
//!
//! let mut pri = Pri::new(FdIo::new(dchan_fd), Role::Cpe, Dialect::Ni2);
//! loop {
//!     if let Some(ev) = pri.run(true)? {
//!         println!("{}", ev);
//!     }
//! }
//! ```

pub mod config;
pub mod controller;
pub mod io;
pub mod q921;
pub mod q931;
pub mod sched;

// Re-exports for convenience
pub use config::PriConfig;
pub use controller::{Pri, PriStats};
pub use io::FrameIo;
#[cfg(unix)]
pub use io::FdIo;
pub use q931::SetupRequest;
pub use sched::TimerId;

// Core types surfaced at the crate root
pub use qpri_core::{
    CallRef, DebugFlags, Dialect, PriError, PriEvent, PriResult, ProtocolError, RingEvent, Role,
    TransferCap, TransferMode,
};
