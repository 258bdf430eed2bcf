//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Board writes (upserts, deletes, reorder batches)
//! - Activity queue (dropped events, failed writes)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Board
// =============================================================================

/// Upserts total by entity.
pub static UPSERTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("laneboard_upserts_total", "Total successful upserts"),
        &["entity"], // "pipeline", "lane", "ticket", "tag", "contact", "member"
    )
    .unwrap()
});

/// Deletes total by entity.
pub static DELETES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("laneboard_deletes_total", "Total successful deletes"),
        &["entity"],
    )
    .unwrap()
});

/// Reorder batches total by kind and result.
pub static REORDER_BATCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("laneboard_reorder_batches_total", "Total reorder batches"),
        &["kind", "result"], // kind: "lanes", "tickets"; result: "success", "failed"
    )
    .unwrap()
});

/// Entries per reorder batch.
pub static REORDER_BATCH_SIZE: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "laneboard_reorder_batch_size",
            "Number of entries per reorder batch",
        )
        .buckets(vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
        &["kind"],
    )
    .unwrap()
});

// =============================================================================
// Activity
// =============================================================================

/// Activity events that could not be queued.
pub static ACTIVITY_EVENTS_DROPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "laneboard_activity_events_dropped_total",
        "Activity events dropped because the queue was full or closed",
    )
    .unwrap()
});

/// Activity records the writer failed to persist.
pub static ACTIVITY_WRITE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "laneboard_activity_write_failures_total",
        "Activity records that failed to persist",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Board
        Box::new(UPSERTS_TOTAL.clone()),
        Box::new(DELETES_TOTAL.clone()),
        Box::new(REORDER_BATCHES.clone()),
        Box::new(REORDER_BATCH_SIZE.clone()),
        // Activity
        Box::new(ACTIVITY_EVENTS_DROPPED.clone()),
        Box::new(ACTIVITY_WRITE_FAILURES.clone()),
    ]
}
