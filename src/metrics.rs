//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

use crate::error::ErrorKind;
use crate::game::types::{MatchKind, Outcome};

/// HTTP request metrics middleware, exposed at `/metrics`.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("arena")
        .endpoint("/metrics")
        .build()
        .expect("metrics builder")
});

/// Resolved matches by kind and outcome.
pub static MATCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "arena_matches_total",
        "Resolved matches by kind and outcome",
        &["kind", "outcome"]
    )
    .expect("arena_matches_total")
});

/// Matches that ended in an error, by kind and error class.
pub static MATCH_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "arena_match_failures_total",
        "Match requests that failed, by kind and error class",
        &["kind", "error"]
    )
    .expect("arena_match_failures_total")
});

pub fn record_match(kind: MatchKind, outcome: Outcome) {
    MATCHES
        .with_label_values(&[kind.label(), outcome.label()])
        .inc();
}

pub fn record_failure(kind: MatchKind, error: ErrorKind) {
    MATCH_FAILURES
        .with_label_values(&[kind.label(), error.as_str()])
        .inc();
}

/// Text exposition of the match counters.
pub fn render() -> Result<String, prometheus::Error> {
    let mut buf = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buf)?;
    String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
