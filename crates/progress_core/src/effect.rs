use std::time::Duration;

/// Delay between a `complete` event and navigation to the results view.
pub const NAVIGATION_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Close the underlying stream connection.
    CloseStream,
    /// Navigate to the results view once, after `delay`.
    ScheduleNavigation { delay: Duration },
}
