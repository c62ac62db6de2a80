use std::net::SocketAddr;

/// Counter: reservations created.
pub const RESERVATIONS_CREATED_TOTAL: &str = "staybook_reservations_created_total";

/// Counter: reservations cancelled.
pub const RESERVATIONS_CANCELLED_TOTAL: &str = "staybook_reservations_cancelled_total";

/// Counter: reservations moved to history by the cutoff sweep.
pub const RESERVATIONS_ARCHIVED_TOTAL: &str = "staybook_reservations_archived_total";

/// Counter: dataset rows skipped during load (bad field count or literal).
pub const ROWS_SKIPPED_TOTAL: &str = "staybook_rows_skipped_total";

/// Counter: failed login attempts.
pub const LOGIN_FAILURES_TOTAL: &str = "staybook_login_failures_total";

/// Histogram: duration of an active-file rewrite in seconds.
pub const ACTIVE_SAVE_DURATION_SECONDS: &str = "staybook_active_save_duration_seconds";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
