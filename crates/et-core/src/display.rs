//! Human-readable elapsed time.

use std::time::Duration;

/// Formats a duration as `<total minutes>:<seconds>`, e.g. `5:09`.
///
/// Minutes are not wrapped into hours; fractional seconds are truncated.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
