//! JSON logging layer: one JSON object per log event, written to stderr.

use std::io::{self, Write};
use std::thread;

use chrono::{Local, SecondsFormat, Utc};
use serde::Serialize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use super::config::TimestampFormat;

/// Serialized shape of a single log event
#[derive(Debug, Clone, Serialize)]
pub struct JsonLogEvent {
    /// Timestamp, omitted when timestamps are disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,
    /// Target module path
    pub target: String,
    /// Log message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    /// Structured fields recorded on the event
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl JsonLogEvent {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: None,
            level: level.to_string(),
            target: target.to_string(),
            message,
            file: None,
            line: None,
            thread: None,
            app: None,
            fields: serde_json::Map::new(),
        }
    }

    /// Stamp the event according to the configured timestamp format
    pub fn stamped(mut self, format: TimestampFormat) -> Self {
        self.timestamp = match format {
            TimestampFormat::Utc => Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            TimestampFormat::Local => {
                Some(Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string())
            }
            TimestampFormat::None => None,
        };
        self
    }
}

/// Layer emitting [`JsonLogEvent`]s
pub(crate) struct JsonLayer {
    app_name: Option<String>,
    include_location: bool,
    include_thread_ids: bool,
    timestamps: TimestampFormat,
}

impl JsonLayer {
    pub(crate) fn new(
        app_name: Option<String>,
        include_location: bool,
        include_thread_ids: bool,
        timestamps: TimestampFormat,
    ) -> Self {
        Self {
            app_name,
            include_location,
            include_thread_ids,
            timestamps,
        }
    }

    fn build(&self, event: &Event<'_>) -> JsonLogEvent {
        let metadata = event.metadata();

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut log_event = JsonLogEvent::new(
            *metadata.level(),
            metadata.target(),
            visitor.message.unwrap_or_default(),
        )
        .stamped(self.timestamps);

        if self.include_location {
            log_event.file = metadata.file().map(str::to_string);
            log_event.line = metadata.line();
        }
        if self.include_thread_ids {
            let current = thread::current();
            log_event.thread = Some(
                current
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{:?}", current.id())),
            );
        }
        log_event.app = self.app_name.clone();
        log_event.fields = visitor.fields;
        log_event
    }
}

impl<S: Subscriber> Layer<S> for JsonLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let log_event = self.build(event);
        if let Ok(json) = serde_json::to_string(&log_event) {
            let _ = writeln!(io::stderr().lock(), "{}", json);
        }
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: serde_json::Map<String, serde_json::Value>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: serde_json::Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let rendered = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.insert(field, serde_json::Value::String(rendered));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.insert(field, serde_json::Value::Number(n));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_without_timestamp() {
        let event = JsonLogEvent::new(Level::INFO, "data_manager", "Opened file".to_string())
            .stamped(TimestampFormat::None);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["level"], "INFO");
        assert_eq!(json["message"], "Opened file");
        assert!(json.get("timestamp").is_none());
        assert!(json.get("fields").is_none());
    }

    #[test]
    fn test_event_utc_timestamp() {
        let event =
            JsonLogEvent::new(Level::WARN, "test", "Skipped".to_string()).stamped(TimestampFormat::Utc);

        let timestamp = event.timestamp.unwrap();
        assert!(timestamp.ends_with('Z'));
    }

    #[test]
    fn test_event_fields_serialized() {
        let mut event = JsonLogEvent::new(Level::WARN, "test", "Skipped line".to_string());
        event
            .fields
            .insert("line_number".to_string(), serde_json::json!(7));

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"line_number\":7"));
        assert!(json.contains("\"level\":\"WARN\""));
    }
}
