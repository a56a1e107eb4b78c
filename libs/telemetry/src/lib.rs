//! Tracing bootstrap and small telemetry helpers shared by msglog services.
//!
//! Logs go through `tracing` with a `fmt` layer (JSON unless `LOG_FORMAT`
//! asks for plain text); counters go through the `metrics` facade and are
//! dropped unless the host installs a recorder.

mod config;
mod context;
mod counters;
mod tracing_init;

pub use config::TelemetryConfig;
pub use context::TelemetryLabels;
pub use counters::{record_counter, with_common_fields};
pub use tracing_init::init_telemetry;

/// Installs the subscriber using environment configuration.
pub fn install(service_name: &str, service_version: &str) -> anyhow::Result<()> {
    init_telemetry(TelemetryConfig::from_env(service_name, service_version))
}
