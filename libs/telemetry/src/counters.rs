use tracing::Span;

use crate::context::TelemetryLabels;

pub fn with_common_fields(span: &Span, labels: &TelemetryLabels) {
    span.record("platform", tracing::field::display(&labels.platform));
    if let Some(message_id) = &labels.message_id {
        span.record("message_id", tracing::field::display(message_id));
    }
    if let Some(sender_id) = &labels.sender_id {
        span.record("sender_id", tracing::field::display(sender_id));
    }
    if let Some(request_id) = &labels.request_id {
        span.record("request_id", tracing::field::display(request_id));
    }
}

pub fn record_counter(name: &'static str, value: u64, labels: &TelemetryLabels) {
    let tags: Vec<metrics::Label> = labels
        .tags()
        .into_iter()
        .map(|(key, value)| metrics::Label::new(key, value))
        .collect();
    metrics::counter!(name, tags).increment(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn common_fields_are_recorded_on_the_span() {
        let span = tracing::info_span!(
            "ingress.handle",
            platform = tracing::field::Empty,
            message_id = tracing::field::Empty,
            sender_id = tracing::field::Empty,
            request_id = tracing::field::Empty
        );
        let labels = TelemetryLabels::new("telegram")
            .with_message("42", "7")
            .with_request_id(Some("rid-1"));
        with_common_fields(&span, &labels);

        span.in_scope(|| tracing::info!("inside"));
        assert!(logs_contain("message_id=42"));
        assert!(logs_contain("request_id=rid-1"));
    }

    #[test]
    fn counters_without_recorder_are_noops() {
        record_counter("messages_logged", 1, &TelemetryLabels::new("telegram"));
    }
}
