//! Cross-chart notification
//!
//! The heatmaps announce the day under the pointer (or the frozen day) with a
//! `heatmap-date-change` event; the radial bar chart listens and redraws its
//! day series. Events travel over a broadcast channel so any number of charts
//! can listen.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, warn};

/// DOM event name the dashboard page listens for
pub const DATE_CHANGE_EVENT: &str = "heatmap-date-change";

const CHANNEL_CAPACITY: usize = 64;

/// Selected day (or none) and the maximum count visible in the heatmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateChangeEvent {
    pub heatmap_date: Option<NaiveDate>,
    pub max_devices: Option<u64>,
}

impl DateChangeEvent {
    pub fn selected(date: NaiveDate, max_devices: Option<u64>) -> Self {
        DateChangeEvent {
            heatmap_date: Some(date),
            max_devices,
        }
    }

    pub fn cleared() -> Self {
        DateChangeEvent::default()
    }

    pub fn name(&self) -> &'static str {
        DATE_CHANGE_EVENT
    }
}

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DateChangeEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        EventBus { sender }
    }

    /// Send to every subscriber; returns how many received it
    pub fn dispatch(&self, event: DateChangeEvent) -> usize {
        debug!(
            "{}: date={:?} max={:?}",
            DATE_CHANGE_EVENT, event.heatmap_date, event.max_devices
        );
        // No subscribers is not an error
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DateChangeEvent> {
        self.sender.subscribe()
    }
}

/// Everything currently queued for `receiver`, oldest first
pub fn drain(receiver: &mut broadcast::Receiver<DateChangeEvent>) -> Vec<DateChangeEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(skipped)) => {
                warn!("Date change listener lagged, {} events dropped", skipped);
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 3, d).unwrap()
    }

    #[test]
    fn test_event_json_shape() {
        let event = DateChangeEvent::selected(date(18), Some(240));
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"heatmapDate":"2019-03-18","maxDevices":240}"#);

        let cleared = serde_json::to_string(&DateChangeEvent::cleared()).unwrap();
        assert_eq!(cleared, r#"{"heatmapDate":null,"maxDevices":null}"#);

        let back: DateChangeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[tokio::test]
    async fn test_bus_delivers_to_all_subscribers() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.dispatch(DateChangeEvent::selected(date(1), None)), 2);
        assert_eq!(bus.dispatch(DateChangeEvent::cleared()), 2);

        assert_eq!(first.recv().await.unwrap().heatmap_date, Some(date(1)));
        let rest = drain(&mut second);
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[1], DateChangeEvent::cleared());
        assert_eq!(drain(&mut first).len(), 1);
    }

    #[test]
    fn test_dispatch_without_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.dispatch(DateChangeEvent::cleared()), 0);
    }

    #[test]
    fn test_drain_after_lag() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe();
        for d in 0..(CHANNEL_CAPACITY + 3) {
            bus.dispatch(DateChangeEvent::selected(date(1), Some(d as u64)));
        }
        let events = drain(&mut receiver);
        assert_eq!(events.len(), CHANNEL_CAPACITY);
        assert_eq!(
            events.last().unwrap().max_devices,
            Some((CHANNEL_CAPACITY + 2) as u64)
        );
    }
}
