#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryLabels {
    pub platform: String,
    pub message_id: Option<String>,
    pub sender_id: Option<String>,
    pub request_id: Option<String>,
}

impl TelemetryLabels {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message_id: &str, sender_id: &str) -> Self {
        self.message_id = non_empty(message_id);
        self.sender_id = non_empty(sender_id);
        self
    }

    pub fn with_request_id(mut self, request_id: Option<&str>) -> Self {
        self.request_id = request_id.map(str::to_string);
        self
    }

    /// Key/value pairs suitable for metric labels. Per-message identifiers are
    /// left out to keep label cardinality bounded.
    pub fn tags(&self) -> Vec<(&'static str, String)> {
        vec![("platform", self.platform.clone())]
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
