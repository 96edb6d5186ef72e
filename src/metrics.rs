//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("notiforge_http_requests_total", "Total number of HTTP requests"),
        &["method", "endpoint", "status"]
    ).expect("metric can be created");
    pub static ref HTTP_REQUEST_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "notiforge_http_request_duration_seconds",
            "HTTP request duration in seconds"
        ).buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["method", "endpoint"]
    ).expect("metric can be created");

    // Database Metrics
    pub static ref DB_QUERIES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("notiforge_db_queries_total", "Total number of database queries"),
        &["operation", "table"]
    ).expect("metric can be created");

    // Engine Metrics
    pub static ref COMPOSE_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("notiforge_compose_total", "Total number of composed payloads"),
        &["notification_type"]
    ).expect("metric can be created");
    pub static ref DISPATCHES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("notiforge_dispatches_total", "Total number of hub dispatch attempts"),
        &["operation", "status"]
    ).expect("metric can be created");
    pub static ref DISPATCH_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "notiforge_dispatch_duration_seconds",
            "Hub dispatch duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"]
    ).expect("metric can be created");

    // Store Sync Metrics
    pub static ref STORE_SYNC_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("notiforge_store_sync_total", "Total number of remote store replication attempts"),
        &["collection", "status"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("notiforge_errors_total", "Total number of errors"),
        &["error_type", "endpoint"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("HTTP_REQUESTS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("HTTP_REQUEST_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(DB_QUERIES_TOTAL.clone()))
        .expect("DB_QUERIES_TOTAL can be registered");
    REGISTRY
        .register(Box::new(COMPOSE_TOTAL.clone()))
        .expect("COMPOSE_TOTAL can be registered");
    REGISTRY
        .register(Box::new(DISPATCHES_TOTAL.clone()))
        .expect("DISPATCHES_TOTAL can be registered");
    REGISTRY
        .register(Box::new(DISPATCH_DURATION_SECONDS.clone()))
        .expect("DISPATCH_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(STORE_SYNC_TOTAL.clone()))
        .expect("STORE_SYNC_TOTAL can be registered");
    REGISTRY
        .register(Box::new(ERRORS_TOTAL.clone()))
        .expect("ERRORS_TOTAL can be registered");

    tracing::info!("Metrics registry initialized");
}
