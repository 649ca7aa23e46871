//! Leveled debug printing for the PRI stack
//!
//! Thread-safe leveled output to stderr, plus the per-controller
//! protocol debug flags that gate frame dumps. The environment is read
//! once, on first use, into an immutable snapshot; only the level can be
//! changed afterwards.
//!
//! # Environment Variables
//!
//! - `PRI_LOG_LEVEL=<level>` - off, error, warn (default), info, debug,
//!   trace; numerals 0-5 also accepted
//! - `PRI_LOG_FLUSH=1` - Flush stderr after each line
//! - `PRI_LOG_TIME=1` - Prefix each line with microseconds since startup
//!
//! # Usage
//!
//! ```ignore
//! use qpri_core::{pri_warn, pri_debug};
//!
//! pri_warn!("ACK received outside of window, ignoring");
//! pri_debug!("-- Making new call for cref {}", cref);
//! ```
//!
//! Lines look like `[WARN ] message`, or `[WARN ] [1042] message` with
//! timestamps on.

use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use crate::env::{env_get_bool, env_get_str};

/// Verbosity levels, most severe first.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    /// Accepts either a level name or its numeral; anything else falls
    /// back to `Warn`.
    pub fn parse(s: &str) -> LogLevel {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" => LogLevel::Off,
            "error" | "1" => LogLevel::Error,
            "warn" | "2" => LogLevel::Warn,
            "info" | "3" => LogLevel::Info,
            "debug" | "4" => LogLevel::Debug,
            "trace" | "5" => LogLevel::Trace,
            _ => LogLevel::Warn,
        }
    }

    fn from_u8(v: u8) -> LogLevel {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Off => "OFF",
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// Environment snapshot, taken once on first log.
struct LogConfig {
    level: LogLevel,
    flush: bool,
    time: bool,
    start: Instant,
}

impl LogConfig {
    fn from_env() -> Self {
        LogConfig {
            level: env_get_str("PRI_LOG_LEVEL")
                .map_or(LogLevel::Warn, |s| LogLevel::parse(&s)),
            flush: env_get_bool("PRI_LOG_FLUSH", false),
            time: env_get_bool("PRI_LOG_TIME", false),
            start: Instant::now(),
        }
    }
}

static CONFIG: OnceLock<LogConfig> = OnceLock::new();

fn config() -> &'static LogConfig {
    CONFIG.get_or_init(LogConfig::from_env)
}

/// Runtime level override; this value defers to the environment snapshot.
const LEVEL_UNSET: u8 = u8::MAX;

static LEVEL_OVERRIDE: AtomicU8 = AtomicU8::new(LEVEL_UNSET);

/// The level currently in force: the programmatic override if one was
/// set, the environment snapshot otherwise.
pub fn log_level() -> LogLevel {
    match LEVEL_OVERRIDE.load(Ordering::Relaxed) {
        LEVEL_UNSET => config().level,
        v => LogLevel::from_u8(v),
    }
}

/// Override the level for the rest of the process.
pub fn set_log_level(level: LogLevel) {
    LEVEL_OVERRIDE.store(level as u8, Ordering::Relaxed);
}

/// Would a line at `level` be emitted right now?
#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    level != LogLevel::Off && level <= log_level()
}

/// Microseconds since the first log line of the process.
#[inline]
pub fn elapsed_us() -> u64 {
    config().start.elapsed().as_micros() as u64
}

/// Internal: one leveled line.
#[doc(hidden)]
pub fn _plog_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    let cfg = config();
    let stderr = std::io::stderr();
    let mut out = stderr.lock();

    let _ = write!(out, "[{:<5}] ", level.name());
    if cfg.time {
        let _ = write!(out, "[{}] ", elapsed_us());
    }
    let _ = out.write_fmt(args);
    let _ = out.write_all(b"\n");

    if cfg.flush {
        let _ = out.flush();
    }
}

/// Internal: one unleveled line, used by the frame dump helpers.
#[doc(hidden)]
pub fn _praw_impl(args: std::fmt::Arguments<'_>) {
    let cfg = config();
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    let _ = out.write_fmt(args);
    let _ = out.write_all(b"\n");
    if cfg.flush {
        let _ = out.flush();
    }
}

// ============================================================================
// Public Macros
// ============================================================================

/// Error level log
#[macro_export]
macro_rules! pri_error {
    ($($arg:tt)*) => {{
        $crate::plog::_plog_impl(
            $crate::plog::LogLevel::Error,
            format_args!($($arg)*)
        );
    }};
}

/// Warning level log
#[macro_export]
macro_rules! pri_warn {
    ($($arg:tt)*) => {{
        $crate::plog::_plog_impl(
            $crate::plog::LogLevel::Warn,
            format_args!($($arg)*)
        );
    }};
}

/// Info level log
#[macro_export]
macro_rules! pri_info {
    ($($arg:tt)*) => {{
        $crate::plog::_plog_impl(
            $crate::plog::LogLevel::Info,
            format_args!($($arg)*)
        );
    }};
}

/// Debug level log
#[macro_export]
macro_rules! pri_debug {
    ($($arg:tt)*) => {{
        $crate::plog::_plog_impl(
            $crate::plog::LogLevel::Debug,
            format_args!($($arg)*)
        );
    }};
}

/// Trace level log
#[macro_export]
macro_rules! pri_trace {
    ($($arg:tt)*) => {{
        $crate::plog::_plog_impl(
            $crate::plog::LogLevel::Trace,
            format_args!($($arg)*)
        );
    }};
}

/// Unleveled print for frame dumps (always emitted when the caller's
/// debug flags request a dump)
#[macro_export]
macro_rules! pri_dump {
    ($($arg:tt)*) => {{
        $crate::plog::_praw_impl(format_args!($($arg)*));
    }};
}

// ============================================================================
// Protocol debug flags
// ============================================================================

/// Per-controller protocol debug flags.
///
/// Independent from the process log level: these select which protocol
/// dumps a controller produces, the level selects how chatty the engines
/// themselves are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebugFlags(u32);

impl DebugFlags {
    pub const NONE: DebugFlags = DebugFlags(0);
    /// Show raw frame octets
    pub const Q921_RAW: DebugFlags = DebugFlags(1 << 0);
    /// Show each interpreted Layer 2 frame
    pub const Q921_DUMP: DebugFlags = DebugFlags(1 << 1);
    /// Trace Layer 2 state machine changes
    pub const Q921_STATE: DebugFlags = DebugFlags(1 << 2);
    /// Show interpreted Layer 3 messages
    pub const Q931_DUMP: DebugFlags = DebugFlags(1 << 5);
    /// Trace Layer 3 state machine changes
    pub const Q931_STATE: DebugFlags = DebugFlags(1 << 6);
    /// Everything
    pub const ALL: DebugFlags = DebugFlags(0xffff);

    #[inline]
    pub fn contains(self, other: DebugFlags) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for DebugFlags {
    type Output = DebugFlags;
    fn bitor(self, rhs: DebugFlags) -> DebugFlags {
        DebugFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for DebugFlags {
    fn bitor_assign(&mut self, rhs: DebugFlags) {
        self.0 |= rhs.0;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_ordered() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_parse() {
        assert_eq!(LogLevel::parse("off"), LogLevel::Off);
        assert_eq!(LogLevel::parse("TRACE"), LogLevel::Trace);
        assert_eq!(LogLevel::parse("3"), LogLevel::Info);
        assert_eq!(LogLevel::parse(" debug "), LogLevel::Debug);
        assert_eq!(LogLevel::parse("bogus"), LogLevel::Warn);
    }

    // One test owns the process-wide level so parallel runs don't race.
    #[test]
    fn test_override_and_macros() {
        set_log_level(LogLevel::Error);
        assert_eq!(log_level(), LogLevel::Error);
        assert!(level_enabled(LogLevel::Error));
        assert!(!level_enabled(LogLevel::Warn));

        set_log_level(LogLevel::Trace);
        assert!(level_enabled(LogLevel::Debug));

        // Off is never "enabled", whatever the level
        assert!(!level_enabled(LogLevel::Off));

        set_log_level(LogLevel::Off); // Suppress output
        pri_error!("error {}", "msg");
        pri_warn!("warn");
        pri_info!("info");
        pri_debug!("debug {}", 42);
        pri_trace!("trace");
    }

    #[test]
    fn test_elapsed_us() {
        let t1 = elapsed_us();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let t2 = elapsed_us();
        assert!(t2 > t1);
    }

    #[test]
    fn test_debug_flags() {
        let f = DebugFlags::Q921_DUMP | DebugFlags::Q931_DUMP;
        assert!(f.contains(DebugFlags::Q921_DUMP));
        assert!(f.contains(DebugFlags::Q931_DUMP));
        assert!(!f.contains(DebugFlags::Q921_RAW));
        assert!(DebugFlags::NONE.is_empty());
        assert!(DebugFlags::ALL.contains(DebugFlags::Q931_STATE));
    }
}
