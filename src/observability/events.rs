//! Observable scan events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events emitted while configuring and driving a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Connection configuration loaded and validated
    ConfigLoaded,
    /// Initial paged request issued for a partition
    ScanBegin,
    /// One page of hits received from the store
    PageFetched,
    /// Empty page received, scan drained
    ScanComplete,
    /// Store request failed, scan aborted
    ScanFailed,
    /// Scroll context released on the store
    ScrollCleared,
    /// Scroll context could not be released
    ScrollClearFailed,
}

impl Event {
    /// Returns the event name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ScanBegin => "SCAN_BEGIN",
            Event::PageFetched => "PAGE_FETCHED",
            Event::ScanComplete => "SCAN_COMPLETE",
            Event::ScanFailed => "SCAN_FAILED",
            Event::ScrollCleared => "SCROLL_CLEARED",
            Event::ScrollClearFailed => "SCROLL_CLEAR_FAILED",
        }
    }

    /// Returns whether the event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::ScanFailed | Event::ScrollClearFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
