//! Notification sinks.

use swaplock_types::{EventType, SwapEvent};
use tracing::info;

use crate::capabilities::EventSink;

/// Records every emitted event in order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SwapEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[SwapEvent] {
        &self.events
    }

    #[must_use]
    pub fn of_type(&self, event_type: EventType) -> Vec<&SwapEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    #[must_use]
    pub fn last(&self) -> Option<&SwapEvent> {
        self.events.last()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: SwapEvent) {
        self.events.push(event);
    }
}

/// Logs every event through `tracing` and keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&mut self, event: SwapEvent) {
        info!(event_type = %event.event_type(), event = ?event, "Event emitted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swaplock_types::OrderId;

    #[test]
    fn log_records_in_order() {
        let mut log = EventLog::new();
        log.emit(SwapEvent::OrderExpired {
            order_id: OrderId::new("a"),
        });
        log.emit(SwapEvent::OrderSettled {
            order_id: OrderId::new("b"),
            resolver: swaplock_types::Address("r".into()),
        });
        assert_eq!(log.events().len(), 2);
        assert_eq!(log.of_type(EventType::ExpireOrder).len(), 1);
        assert_eq!(log.last().unwrap().event_type(), EventType::SettleOrder);
        log.clear();
        assert!(log.events().is_empty());
    }

    #[test]
    fn tracing_sink_accepts_events() {
        let mut sink = TracingEventSink;
        sink.emit(SwapEvent::OrderExpired {
            order_id: OrderId::new("a"),
        });
    }
}
