use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated by the click router.
#[derive(Debug, Default, Clone)]
pub struct RouterMetrics {
    clicks_handled: u64,
    clicks_unhandled: u64,
    clicks_ignored: u64,
    renders: u64,
    closes_notified: u64,
    closes_suppressed: u64,
}

impl RouterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_handled_click(&mut self) {
        self.clicks_handled = self.clicks_handled.saturating_add(1);
    }

    pub fn record_unhandled_click(&mut self) {
        self.clicks_unhandled = self.clicks_unhandled.saturating_add(1);
    }

    pub fn record_ignored_click(&mut self) {
        self.clicks_ignored = self.clicks_ignored.saturating_add(1);
    }

    pub fn record_render(&mut self) {
        self.renders = self.renders.saturating_add(1);
    }

    pub fn record_close(&mut self, suppressed: bool) {
        if suppressed {
            self.closes_suppressed = self.closes_suppressed.saturating_add(1);
        } else {
            self.closes_notified = self.closes_notified.saturating_add(1);
        }
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            clicks_handled: self.clicks_handled,
            clicks_unhandled: self.clicks_unhandled,
            clicks_ignored: self.clicks_ignored,
            renders: self.renders,
            closes_notified: self.closes_notified,
            closes_suppressed: self.closes_suppressed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub clicks_handled: u64,
    pub clicks_unhandled: u64,
    pub clicks_ignored: u64,
    pub renders: u64,
    pub closes_notified: u64,
    pub closes_suppressed: u64,
}

impl MetricSnapshot {
    pub fn total_clicks(&self) -> u64 {
        self.clicks_handled + self.clicks_unhandled + self.clicks_ignored
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("clicks_handled".to_string(), json!(self.clicks_handled));
        map.insert("clicks_unhandled".to_string(), json!(self.clicks_unhandled));
        map.insert("clicks_ignored".to_string(), json!(self.clicks_ignored));
        map.insert("renders".to_string(), json!(self.renders));
        map.insert("closes_notified".to_string(), json!(self.closes_notified));
        map.insert("closes_suppressed".to_string(), json!(self.closes_suppressed));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "router_metrics", self.as_fields())
    }
}
