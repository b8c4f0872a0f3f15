use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static CRUD_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "crud_requests_total",
        "CRUD operations handled, by entity, operation and response status",
        &["entity", "operation", "status"]
    )
    .expect("register crud_requests_total")
});

pub fn record(entity: &str, operation: &str, status: StatusCode) {
    CRUD_REQUESTS_TOTAL
        .with_label_values(&[entity, operation, status.as_str()])
        .inc();
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

pub async fn metrics() -> (StatusCode, String) {
    encode_metrics()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_increments_labelled_counter() {
        let before = CRUD_REQUESTS_TOTAL.with_label_values(&["metrics_test", "find_by_id", "404"]).get();
        record("metrics_test", "find_by_id", StatusCode::NOT_FOUND);
        let after = CRUD_REQUESTS_TOTAL.with_label_values(&["metrics_test", "find_by_id", "404"]).get();
        assert_eq!(after, before + 1);

        let (status, body) = encode_metrics();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("crud_requests_total"));
        assert!(body.contains("entity=\"metrics_test\""));
    }
}
