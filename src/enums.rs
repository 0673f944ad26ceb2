//! Integer codes used by the Cachet API
//!
//! These values go over the wire unchanged and must match the server.

// Component status
pub const COMPONENT_STATUS_UNKNOWN: i64 = 0;
pub const COMPONENT_STATUS_OPERATIONAL: i64 = 1;
pub const COMPONENT_STATUS_PERFORMANCE_ISSUES: i64 = 2;
pub const COMPONENT_STATUS_PARTIAL_OUTAGE: i64 = 3;
pub const COMPONENT_STATUS_MAJOR_OUTAGE: i64 = 4;

/// All component statuses, ordered from best to worst
pub const COMPONENT_STATUS_LIST: [i64; 5] = [
    COMPONENT_STATUS_UNKNOWN,
    COMPONENT_STATUS_OPERATIONAL,
    COMPONENT_STATUS_PERFORMANCE_ISSUES,
    COMPONENT_STATUS_PARTIAL_OUTAGE,
    COMPONENT_STATUS_MAJOR_OUTAGE,
];

// Component group collapse state
pub const COMPONENT_GROUP_COLLAPSED_FALSE: i64 = 0;
pub const COMPONENT_GROUP_COLLAPSED_TRUE: i64 = 1;
/// Collapsed unless a component in the group is not operational
pub const COMPONENT_GROUP_COLLAPSED_NOT_OPERATIONAL: i64 = 2;

// Component group visibility
pub const COMPONENT_GROUP_VISIBILITY_LOGGED_IN: i64 = 0;
pub const COMPONENT_GROUP_VISIBILITY_PUBLIC: i64 = 1;

// Incident status
pub const INCIDENT_SCHEDULED: i64 = 0;
pub const INCIDENT_INVESTIGATING: i64 = 1;
pub const INCIDENT_IDENTIFIED: i64 = 2;
pub const INCIDENT_WATCHING: i64 = 3;
pub const INCIDENT_FIXED: i64 = 4;

// Metric calculation
pub const METRIC_CALC_SUM: i64 = 0;
pub const METRIC_CALC_AVG: i64 = 1;

// Metric default view
pub const METRIC_VIEW_LAST_HOUR: i64 = 0;
pub const METRIC_VIEW_LAST_12_HOURS: i64 = 1;
pub const METRIC_VIEW_LAST_WEEK: i64 = 2;
pub const METRIC_VIEW_LAST_MONTH: i64 = 3;

/// Human readable name of a component status code
pub fn component_status_name(status: i64) -> &'static str {
    match status {
        COMPONENT_STATUS_OPERATIONAL => "Operational",
        COMPONENT_STATUS_PERFORMANCE_ISSUES => "Performance Issues",
        COMPONENT_STATUS_PARTIAL_OUTAGE => "Partial Outage",
        COMPONENT_STATUS_MAJOR_OUTAGE => "Major Outage",
        _ => "Unknown",
    }
}

/// Human readable name of an incident status code
pub fn incident_status_name(status: i64) -> &'static str {
    match status {
        INCIDENT_SCHEDULED => "Scheduled",
        INCIDENT_INVESTIGATING => "Investigating",
        INCIDENT_IDENTIFIED => "Identified",
        INCIDENT_WATCHING => "Watching",
        INCIDENT_FIXED => "Fixed",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_server_values() {
        assert_eq!(COMPONENT_STATUS_LIST, [0, 1, 2, 3, 4]);
        assert_eq!(COMPONENT_GROUP_COLLAPSED_NOT_OPERATIONAL, 2);
        assert_eq!(INCIDENT_FIXED, 4);
        assert_eq!(METRIC_VIEW_LAST_MONTH, 3);
    }

    #[test]
    fn test_status_names() {
        assert_eq!(component_status_name(COMPONENT_STATUS_MAJOR_OUTAGE), "Major Outage");
        assert_eq!(component_status_name(99), "Unknown");
        assert_eq!(incident_status_name(INCIDENT_WATCHING), "Watching");
    }
}
