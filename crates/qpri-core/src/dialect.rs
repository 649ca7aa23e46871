//! Switch dialect and node role
//!
//! The dialect influences exactly three behaviors in the core: the 4ESS
//! 3.1 kHz audio code remap, caller presentation normalization for
//! DMS100/4ESS, and the non-ISDN progress indicator NI2 wants in SETUP.

use std::fmt;

/// Which end of the link this controller plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Network,
    Cpe,
}

impl Role {
    /// C/R bit value for command frames sent from this role.
    /// The network side sets C/R=1 on commands, the CPE side C/R=0;
    /// responses are the opposite.
    #[inline]
    pub fn command_cr(self) -> bool {
        matches!(self, Role::Network)
    }

    /// C/R bit value for response frames sent from this role.
    #[inline]
    pub fn response_cr(self) -> bool {
        !self.command_cr()
    }

    /// The role the peer must be playing.
    #[inline]
    pub fn opposite(self) -> Role {
        match self {
            Role::Network => Role::Cpe,
            Role::Cpe => Role::Network,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Network => write!(f, "Network"),
            Role::Cpe => write!(f, "CPE"),
        }
    }
}

/// Vendor/country protocol variant selected at controller creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Unknown,
    /// National ISDN 2
    Ni2,
    /// Nortel DMS 100
    Dms100,
    /// Lucent 5E
    Lucent5e,
    /// AT&T 4ESS
    Att4ess,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dialect::Unknown => "Unknown switchtype",
            Dialect::Ni2 => "National ISDN",
            Dialect::Dms100 => "Nortel DMS100",
            Dialect::Lucent5e => "Lucent 5E",
            Dialect::Att4ess => "AT&T 4ESS",
        };
        write!(f, "{}", s)
    }
}
