//! Shared Q.931 code points
//!
//! Numbering plans, presentation/screening, coding standards, locations and
//! progress descriptions. These are plain code points rather than enums:
//! they pass through the stack uninterpreted except where a specific value
//! changes behavior, and unknown values must survive a round trip.

// ── Dialing plan (type of number + numbering plan octet) ──────────

pub const PLAN_UNKNOWN: u8 = 0x00;
pub const PLAN_INTERNATIONAL_ISDN: u8 = 0x11;
pub const PLAN_NATIONAL_ISDN: u8 = 0x21;
pub const PLAN_LOCAL_ISDN: u8 = 0x41;
pub const PLAN_PRIVATE: u8 = 0x49;

pub fn plan_to_str(plan: u8) -> &'static str {
    match plan {
        PLAN_INTERNATIONAL_ISDN => "International number in ISDN",
        PLAN_NATIONAL_ISDN => "National number in ISDN",
        PLAN_LOCAL_ISDN => "Local number in ISDN",
        PLAN_PRIVATE => "Private numbering plan",
        PLAN_UNKNOWN => "Unknown numbering plan",
        _ => "Unknown",
    }
}

// ── Presentation / screening ──────────────────────────────────────

pub const PRES_ALLOWED_USER_NOT_SCREENED: u8 = 0x00;
pub const PRES_ALLOWED_USER_PASSED_SCREEN: u8 = 0x01;
pub const PRES_ALLOWED_USER_FAILED_SCREEN: u8 = 0x02;
pub const PRES_ALLOWED_NETWORK_NUMBER: u8 = 0x03;
pub const PRES_PROHIB_USER_NOT_SCREENED: u8 = 0x20;
pub const PRES_PROHIB_USER_PASSED_SCREEN: u8 = 0x21;
pub const PRES_PROHIB_USER_FAILED_SCREEN: u8 = 0x22;
pub const PRES_PROHIB_NETWORK_NUMBER: u8 = 0x23;
pub const PRES_NUMBER_NOT_AVAILABLE: u8 = 0x43;

pub fn pres_to_str(pres: u8) -> &'static str {
    match pres {
        PRES_ALLOWED_USER_NOT_SCREENED => "Presentation permitted, user number not screened",
        PRES_ALLOWED_USER_PASSED_SCREEN => "Presentation permitted, user number passed network screening",
        PRES_ALLOWED_USER_FAILED_SCREEN => "Presentation permitted, user number failed network screening",
        PRES_ALLOWED_NETWORK_NUMBER => "Presentation allowed of network provided number",
        PRES_PROHIB_USER_NOT_SCREENED => "Presentation prohibited, user number not screened",
        PRES_PROHIB_USER_PASSED_SCREEN => "Presentation prohibited, user number passed network screening",
        PRES_PROHIB_USER_FAILED_SCREEN => "Presentation prohibited, user number failed network screening",
        PRES_PROHIB_NETWORK_NUMBER => "Presentation prohibited of network provided number",
        PRES_NUMBER_NOT_AVAILABLE => "Number not available",
        _ => "Unknown",
    }
}

// ── Coding standards ──────────────────────────────────────────────

pub const CODE_CCITT: u8 = 0x0;
pub const CODE_NATIONAL: u8 = 0x2;
pub const CODE_NETWORK_SPECIFIC: u8 = 0x3;

pub fn coding_to_str(code: u8) -> &'static str {
    match code {
        CODE_CCITT => "CCITT (ITU) standard",
        CODE_NATIONAL => "National standard",
        CODE_NETWORK_SPECIFIC => "Network specific standard",
        _ => "Unknown",
    }
}

// ── Locations ─────────────────────────────────────────────────────

pub const LOC_USER: u8 = 0x0;
pub const LOC_PRIV_NET_LOCAL_USER: u8 = 0x1;
pub const LOC_PUB_NET_LOCAL_USER: u8 = 0x2;
pub const LOC_TRANSIT_NET: u8 = 0x3;
pub const LOC_PUB_NET_REMOTE_USER: u8 = 0x4;
pub const LOC_PRIV_NET_REMOTE_USER: u8 = 0x5;
pub const LOC_INTERNATIONAL_NETWORK: u8 = 0x7;
pub const LOC_NETWORK_BEYOND_INTERWORKING: u8 = 0xa;

pub fn location_to_str(loc: u8) -> &'static str {
    match loc {
        LOC_USER => "User",
        LOC_PRIV_NET_LOCAL_USER => "Private network serving the local user",
        LOC_PUB_NET_LOCAL_USER => "Public network serving the local user",
        LOC_TRANSIT_NET => "Transit network",
        LOC_PUB_NET_REMOTE_USER => "Public network serving the remote user",
        LOC_PRIV_NET_REMOTE_USER => "Private network serving the remote user",
        LOC_INTERNATIONAL_NETWORK => "International network",
        LOC_NETWORK_BEYOND_INTERWORKING => "Network beyond the interworking point",
        _ => "Unknown",
    }
}

// ── Progress descriptions ─────────────────────────────────────────

pub const PROG_NOT_END_TO_END_ISDN: u8 = 0x1;
pub const PROG_CALLED_NOT_ISDN: u8 = 0x2;
pub const PROG_CALLER_NOT_ISDN: u8 = 0x3;
pub const PROG_INBAND_AVAILABLE: u8 = 0x8;
pub const PROG_DELAY_AT_INTERFACE: u8 = 0xa;

pub fn progress_to_str(prog: u8) -> &'static str {
    match prog {
        PROG_NOT_END_TO_END_ISDN => "Call is not end-to-end ISDN; further call progress information may be available inband",
        PROG_CALLED_NOT_ISDN => "Called equipment is non-ISDN",
        PROG_CALLER_NOT_ISDN => "Calling equipment is non-ISDN",
        PROG_INBAND_AVAILABLE => "Inband information or appropriate pattern now available",
        PROG_DELAY_AT_INTERFACE => "Delay in response at called interface",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_names() {
        assert_eq!(plan_to_str(PLAN_NATIONAL_ISDN), "National number in ISDN");
        assert_eq!(plan_to_str(0x7e), "Unknown");
    }

    #[test]
    fn test_pres_names() {
        assert!(pres_to_str(PRES_ALLOWED_USER_NOT_SCREENED).starts_with("Presentation permitted"));
        assert!(pres_to_str(PRES_PROHIB_NETWORK_NUMBER).starts_with("Presentation prohibited"));
    }

    #[test]
    fn test_progress_names() {
        assert_eq!(progress_to_str(PROG_CALLED_NOT_ISDN), "Called equipment is non-ISDN");
    }
}
