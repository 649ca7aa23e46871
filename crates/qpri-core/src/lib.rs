//! # qpri-core
//!
//! Core types for the qpri ISDN PRI signaling stack.
//!
//! This crate is platform-agnostic and contains no OS-specific code.
//! The protocol engines and D-channel I/O live in the `qpri` crate.
//!
//! ## Modules
//!
//! - `cref` - Call reference identifier type
//! - `event` - Upward event enum delivered by the controller
//! - `cause` - Q.850 cause values and display helpers
//! - `dialect` - Switch dialect and node role enums
//! - `codes` - Numbering plan, presentation, coding standard and
//!   location code points
//! - `bearer` - Bearer capability code points
//! - `error` - Error types
//! - `plog` - Leveled debug printing macros and protocol debug flags
//! - `env` - Environment variable utilities

#![allow(dead_code)]

pub mod bearer;
pub mod cause;
pub mod codes;
pub mod cref;
pub mod dialect;
pub mod env;
pub mod error;
pub mod event;
pub mod plog;

// Re-exports for convenience
pub use bearer::{TransferCap, TransferMode};
pub use cause::cause_to_str;
pub use cref::CallRef;
pub use dialect::{Dialect, Role};
pub use error::{PriError, PriResult, ProtocolError};
pub use event::{PriEvent, RingEvent};
pub use plog::DebugFlags;
