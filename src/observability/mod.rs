//! Observability for scans
//!
//! - Structured logging (one JSON object per line on stderr)
//! - Atomic scan counters
//! - Typed lifecycle events
//!
//! Observability is read-only: nothing here changes what a cursor returns.
//!
//! ```ignore
//! use searchtable::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::PageFetched, &[("hits", "100")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.record_page(100);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;

/// Log a lifecycle event with fields.
///
/// Failures go out at ERROR, except a failed scroll release which is
/// only a WARN since the store expires the context on its own.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = match event {
        Event::ScanFailed => Severity::Error,
        Event::ScrollClearFailed => Severity::Warn,
        Event::PageFetched => Severity::Trace,
        _ => Severity::Info,
    };
    Logger::log(severity, event.as_str(), fields);
}
