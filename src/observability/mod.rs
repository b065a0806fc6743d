//! Observability for schema loading, vocabularies and object validation
//!
//! Events are typed (`Event`) and written through `tracing`, one record per
//! event with its fields attached. Nothing here influences a validation
//! outcome; with no subscriber installed every call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use schemafields::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::SchemasLoaded, &[("count", "3")]);
//! ```

mod events;

pub use events::{Event, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let rendered = render_fields(fields);
    let name = event.as_str();
    match event.severity() {
        Severity::Trace => tracing::trace!(event = name, fields = %rendered),
        Severity::Debug => tracing::debug!(event = name, fields = %rendered),
        Severity::Info => tracing::info!(event = name, fields = %rendered),
        Severity::Warn => tracing::warn!(event = name, fields = %rendered),
    }
}

/// Fields in deterministic order, `key=value` separated by spaces.
fn render_fields(fields: &[(&str, &str)]) -> String {
    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_render_sorted() {
        let rendered = render_fields(&[("schema", "IPerson"), ("count", "2")]);
        assert_eq!(rendered, "count=2 schema=IPerson");
    }

    #[test]
    fn test_log_event() {
        // No subscriber; verifies no panic
        log_event(Event::SchemasLoaded);
        log_event_with_fields(Event::ObjectCycleBroken, &[("schema", "INode")]);
    }
}
