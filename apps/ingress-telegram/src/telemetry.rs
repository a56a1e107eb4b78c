use msglog_core::Record;
use msglog_telemetry::{TelemetryLabels, record_counter, with_common_fields};
use tracing::Span;

const PLATFORM: &str = "telegram";
const LOGGED_COUNTER: &str = "messages_logged";
const SKIPPED_COUNTER: &str = "updates_without_message";
const FAILED_COUNTER: &str = "message_log_failures";
const INGRESS_SPAN_NAME: &str = "ingress.handle";

pub fn start_ingress_span(request_id: Option<&str>) -> Span {
    let span = tracing::info_span!(
        INGRESS_SPAN_NAME,
        platform = PLATFORM,
        message_id = tracing::field::Empty,
        sender_id = tracing::field::Empty,
        request_id = tracing::field::Empty
    );
    with_common_fields(
        &span,
        &TelemetryLabels::new(PLATFORM).with_request_id(request_id),
    );
    span
}

/// Tags the current ingress span with the identifiers of an extracted record.
pub fn annotate_span(span: &Span, record: &Record) {
    with_common_fields(
        span,
        &TelemetryLabels::new(PLATFORM).with_message(&record.message_id, &record.sender_id),
    );
}

pub fn record_logged() {
    record_counter(LOGGED_COUNTER, 1, &TelemetryLabels::new(PLATFORM));
}

pub fn record_skipped() {
    record_counter(SKIPPED_COUNTER, 1, &TelemetryLabels::new(PLATFORM));
}

pub fn record_failure() {
    record_counter(FAILED_COUNTER, 1, &TelemetryLabels::new(PLATFORM));
}
