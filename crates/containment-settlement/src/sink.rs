//! Event sinks that collect the day log as systems run.

use containment_types::DayEvent;

/// Receives events emitted by settlement systems, in emission order.
pub trait EventSink {
    /// Record one event.
    fn emit(&mut self, event: DayEvent);
}

impl EventSink for Vec<DayEvent> {
    fn emit(&mut self, event: DayEvent) {
        self.push(event);
    }
}

/// Sink that discards everything. Useful when only state effects matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: DayEvent) {}
}
