//! Elapsed-time formatting for task diagnostics

use std::time::Duration;

/// Format a duration as fractional seconds with two decimal places
///
/// Used by the busy-task diagnostics, which report how long the in-flight
/// run has been going.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "foundation")]
/// # {
/// use std::time::Duration;
///
/// use taskguard_common::time::format::format_seconds;
///
/// assert_eq!(format_seconds(Duration::from_millis(3456)), "3.46");
/// assert_eq!(format_seconds(Duration::ZERO), "0.00");
/// # }
/// ```
pub fn format_seconds(duration: Duration) -> String {
    // Round on whole milliseconds so halves go up like a decimal display would.
    let centis = (duration.as_millis() + 5) / 10;
    format!("{}.{:02}", centis / 100, centis % 100)
}
