//! Provisioning counters.
//!
//! Recorded through the `metrics` facade; they are no-ops until the host
//! process installs a recorder.

use metrics::counter;

use crate::logging::is_observability_enabled;

pub fn track_user_created(country: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("users_created_total", "country" => country.to_string()).increment(1);
}

/// A username insert lost the race on the given attempt (1-based).
pub fn track_username_conflict(attempt: u32) {
    if !is_observability_enabled() {
        return;
    }
    counter!("username_conflicts_total", "attempt" => attempt.to_string()).increment(1);
}

pub fn track_provisioning_failure(reason: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("provisioning_failures_total", "reason" => reason.to_string()).increment(1);
}
