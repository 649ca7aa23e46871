//! Q.850 cause values
//!
//! The numbering follows ITU-T Q.850. Only `NORMAL_CLEARING` is assumed by
//! the core itself (the default hangup cause); everything else is carried
//! opaquely between the peer and the embedding application.

/// Unallocated (unassigned) number
pub const CAUSE_UNALLOCATED: u8 = 1;
pub const CAUSE_NO_ROUTE_TRANSIT_NET: u8 = 2;
pub const CAUSE_NO_ROUTE_DESTINATION: u8 = 3;
pub const CAUSE_CHANNEL_UNACCEPTABLE: u8 = 6;
pub const CAUSE_CALL_AWARDED_DELIVERED: u8 = 7;
/// Normal clearing; the default cause for `hangup`
pub const CAUSE_NORMAL_CLEARING: u8 = 16;
pub const CAUSE_USER_BUSY: u8 = 17;
pub const CAUSE_NO_USER_RESPONSE: u8 = 18;
pub const CAUSE_NO_ANSWER: u8 = 19;
pub const CAUSE_CALL_REJECTED: u8 = 21;
pub const CAUSE_DESTINATION_OUT_OF_ORDER: u8 = 27;
pub const CAUSE_INVALID_NUMBER_FORMAT: u8 = 28;
pub const CAUSE_RESPONSE_TO_STATUS_ENQUIRY: u8 = 30;
pub const CAUSE_NORMAL_UNSPECIFIED: u8 = 31;
pub const CAUSE_CIRCUIT_CONGESTION: u8 = 34;
pub const CAUSE_TEMPORARY_FAILURE: u8 = 41;
pub const CAUSE_SWITCH_CONGESTION: u8 = 42;
pub const CAUSE_ACCESS_INFO_DISCARDED: u8 = 43;
pub const CAUSE_REQUESTED_CHAN_UNAVAIL: u8 = 44;
pub const CAUSE_BEARERCAPABILITY_NOTAUTH: u8 = 57;
/// Bearer capability not implemented; sent when a SETUP asks for anything
/// but 64k circuit mode
pub const CAUSE_BEARERCAPABILITY_NOTIMPL: u8 = 65;
pub const CAUSE_INVALID_CALL_REFERENCE: u8 = 81;
pub const CAUSE_INCOMPATIBLE_DESTINATION: u8 = 88;
pub const CAUSE_MANDATORY_IE_MISSING: u8 = 96;
pub const CAUSE_MESSAGE_TYPE_NONEXIST: u8 = 97;
pub const CAUSE_IE_NONEXIST: u8 = 99;
pub const CAUSE_INVALID_IE_CONTENTS: u8 = 100;
pub const CAUSE_WRONG_CALL_STATE: u8 = 101;
pub const CAUSE_RECOVERY_ON_TIMER_EXPIRE: u8 = 102;
pub const CAUSE_PROTOCOL_ERROR: u8 = 111;
pub const CAUSE_INTERWORKING: u8 = 127;

/// Human-readable name for a cause value.
pub fn cause_to_str(cause: u8) -> &'static str {
    match cause {
        CAUSE_UNALLOCATED => "Unallocated (unassigned) number",
        CAUSE_NO_ROUTE_TRANSIT_NET => "No route to specified transit network",
        CAUSE_NO_ROUTE_DESTINATION => "No route to destination",
        CAUSE_CHANNEL_UNACCEPTABLE => "Channel unacceptable",
        CAUSE_CALL_AWARDED_DELIVERED => "Call awarded and being delivered in an established channel",
        CAUSE_NORMAL_CLEARING => "Normal clearing",
        CAUSE_USER_BUSY => "User busy",
        CAUSE_NO_USER_RESPONSE => "No user responding",
        CAUSE_NO_ANSWER => "User alerting, no answer",
        CAUSE_CALL_REJECTED => "Call rejected",
        CAUSE_DESTINATION_OUT_OF_ORDER => "Destination out of order",
        CAUSE_INVALID_NUMBER_FORMAT => "Invalid number format",
        CAUSE_RESPONSE_TO_STATUS_ENQUIRY => "Response to STATUS ENQUIRY",
        CAUSE_NORMAL_UNSPECIFIED => "Normal, unspecified",
        CAUSE_CIRCUIT_CONGESTION => "Circuit/channel congestion",
        CAUSE_TEMPORARY_FAILURE => "Temporary failure",
        CAUSE_SWITCH_CONGESTION => "Switching equipment congestion",
        CAUSE_ACCESS_INFO_DISCARDED => "Access information discarded",
        CAUSE_REQUESTED_CHAN_UNAVAIL => "Requested channel not available",
        CAUSE_BEARERCAPABILITY_NOTAUTH => "Bearer capability not authorized",
        CAUSE_BEARERCAPABILITY_NOTIMPL => "Bearer capability not implemented",
        CAUSE_INVALID_CALL_REFERENCE => "Invalid call reference value",
        CAUSE_INCOMPATIBLE_DESTINATION => "Incompatible destination",
        CAUSE_MANDATORY_IE_MISSING => "Mandatory information element is missing",
        CAUSE_MESSAGE_TYPE_NONEXIST => "Message type nonexistent",
        CAUSE_IE_NONEXIST => "Information element nonexistent or not implemented",
        CAUSE_INVALID_IE_CONTENTS => "Invalid information element contents",
        CAUSE_WRONG_CALL_STATE => "Message not compatible with call state",
        CAUSE_RECOVERY_ON_TIMER_EXPIRE => "Recovery on timer expiry",
        CAUSE_PROTOCOL_ERROR => "Protocol error, unspecified",
        CAUSE_INTERWORKING => "Interworking, unspecified",
        _ => "Unknown",
    }
}

/// Name of the cause class (top three bits of the value).
pub fn cause_class_to_str(cause: u8) -> &'static str {
    match (cause & 0x7f) >> 4 {
        0 | 1 => "Normal event",
        2 => "Network congestion",
        3 => "Service or option not available",
        4 => "Service or option not implemented",
        5 => "Invalid message",
        6 => "Protocol error",
        7 => "Interworking",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(cause_to_str(16), "Normal clearing");
        assert_eq!(cause_to_str(65), "Bearer capability not implemented");
        assert_eq!(cause_to_str(250), "Unknown");
    }

    #[test]
    fn test_classes() {
        assert_eq!(cause_class_to_str(CAUSE_NORMAL_CLEARING), "Normal event");
        assert_eq!(cause_class_to_str(CAUSE_CIRCUIT_CONGESTION), "Network congestion");
        assert_eq!(cause_class_to_str(CAUSE_BEARERCAPABILITY_NOTIMPL), "Service or option not implemented");
        assert_eq!(cause_class_to_str(CAUSE_PROTOCOL_ERROR), "Protocol error");
        assert_eq!(cause_class_to_str(CAUSE_INTERWORKING), "Interworking");
    }
}
