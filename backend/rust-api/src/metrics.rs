use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

use crate::models::game::GameStatus;

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Business Metrics
    pub static ref GAMES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "games_total",
        "Total number of games by lifecycle event",
        &["status"]
    )
    .unwrap();

    pub static ref GAMES_ACTIVE: IntGauge = register_int_gauge!(
        "games_active",
        "Number of games currently in progress"
    )
    .unwrap();

    pub static ref ANSWERS_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "answers_submitted_total",
        "Total number of answers submitted",
        &["outcome"]
    )
    .unwrap();

    pub static ref HINTS_REQUESTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "hints_requested_total",
        "Total number of hints requested",
        &["hint"]
    )
    .unwrap();

    pub static ref PRIZES_PAID_TOTAL: IntCounter = register_int_counter!(
        "prizes_paid_total",
        "Sum of prizes credited to player balances"
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

pub fn record_game_created() {
    GAMES_TOTAL.with_label_values(&["created"]).inc();
    GAMES_ACTIVE.inc();
}

/// Record a game leaving `in_progress`
pub fn record_game_finished(status: GameStatus, prize: u64) {
    GAMES_TOTAL.with_label_values(&[status.as_str()]).inc();
    GAMES_ACTIVE.dec();
    PRIZES_PAID_TOTAL.inc_by(prize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        let _ = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/health", "200"])
            .get();
        let _ = GAMES_TOTAL.with_label_values(&["created"]).get();
    }

    #[test]
    fn test_render_metrics() {
        record_game_created();
        record_game_finished(GameStatus::Money, 500);

        let output = render_metrics().unwrap();
        assert!(output.contains("games_total"));
        assert!(output.contains("prizes_paid_total"));
    }
}
