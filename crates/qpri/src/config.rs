//! Controller configuration
//!
//! Builder-style knobs for a D-channel controller. Timer intervals honor
//! environment overrides so deployments can tune them without recompiling:
//!
//! - `PRI_T200_MS` - retransmission timer interval (default 1000)
//! - `PRI_T203_MS` - idle poll timer interval (default 10000)

use qpri_core::env::env_get_u64;
use qpri_core::{DebugFlags, Dialect, Role};

/// Default T200 (retransmission) interval in milliseconds.
pub const DEFAULT_T200_MS: u64 = 1000;

/// Default T203 (max idle) interval in milliseconds.
pub const DEFAULT_T203_MS: u64 = 10000;

/// Configuration for a `Pri` controller.
#[derive(Debug, Clone)]
pub struct PriConfig {
    /// Which end of the link we play
    pub role: Role,
    /// Switch dialect
    pub dialect: Dialect,
    /// Retransmission timer interval (ms); also paces SABME retries
    pub t200_ms: u64,
    /// Idle poll timer interval (ms)
    pub t203_ms: u64,
    /// Protocol debug flags
    pub debug: DebugFlags,
}

impl PriConfig {
    /// Configuration with defaults and environment overrides applied.
    pub fn new(role: Role, dialect: Dialect) -> Self {
        Self {
            role,
            dialect,
            t200_ms: env_get_u64("PRI_T200_MS", DEFAULT_T200_MS),
            t203_ms: env_get_u64("PRI_T203_MS", DEFAULT_T203_MS),
            debug: DebugFlags::NONE,
        }
    }

    /// Override the T200 interval.
    pub fn t200_ms(mut self, ms: u64) -> Self {
        self.t200_ms = ms;
        self
    }

    /// Override the T203 interval.
    pub fn t203_ms(mut self, ms: u64) -> Self {
        self.t203_ms = ms;
        self
    }

    /// Set protocol debug flags.
    pub fn debug(mut self, flags: DebugFlags) -> Self {
        self.debug = flags;
        self
    }
}
