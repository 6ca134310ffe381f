//! Prometheus metrics for the API server.
//!
//! Pipeline counters (model invocations, render attempts/outcomes) are
//! emitted from the engine crate; this module only installs the recorder
//! that collects them.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}
