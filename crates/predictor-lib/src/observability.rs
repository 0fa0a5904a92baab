//! Observability infrastructure for the prediction service
//!
//! Provides:
//! - Prometheus metrics (prediction/training latency, counters, model info)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_gauge, GaugeVec,
    Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for per-request prediction latency (in seconds)
const PREDICTION_LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Histogram buckets for full training runs (in seconds)
const TRAINING_LATENCY_BUCKETS: &[f64] = &[0.05, 0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PredictorMetricsInner> = OnceLock::new();

struct PredictorMetricsInner {
    prediction_latency_seconds: Histogram,
    training_latency_seconds: Histogram,
    predictions_total: IntCounter,
    prediction_errors_total: IntCounter,
    training_runs_total: IntCounter,
    training_errors_total: IntCounter,
    dataset_rows: IntGauge,
    model_info: GaugeVec,
}

impl PredictorMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "delay_predictor_prediction_latency_seconds",
                "Time spent computing a single prediction",
                PREDICTION_LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            training_latency_seconds: register_histogram!(
                "delay_predictor_training_latency_seconds",
                "Time spent on a full training run",
                TRAINING_LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register training_latency_seconds"),

            predictions_total: register_int_counter!(
                "delay_predictor_predictions_total",
                "Total number of predictions served"
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter!(
                "delay_predictor_prediction_errors_total",
                "Total number of failed prediction requests"
            )
            .expect("Failed to register prediction_errors_total"),

            training_runs_total: register_int_counter!(
                "delay_predictor_training_runs_total",
                "Total number of completed training runs"
            )
            .expect("Failed to register training_runs_total"),

            training_errors_total: register_int_counter!(
                "delay_predictor_training_errors_total",
                "Total number of failed training runs"
            )
            .expect("Failed to register training_errors_total"),

            dataset_rows: register_int_gauge!(
                "delay_predictor_dataset_rows",
                "Number of rows in the dataset the current model was trained on"
            )
            .expect("Failed to register dataset_rows"),

            model_info: register_gauge_vec!(
                "delay_predictor_model_info",
                "Information about the currently loaded model",
                &["model", "trained_at"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Metrics handle for Prometheus exposition
///
/// A lightweight handle to the global metrics instance; clones share the
/// same underlying collectors.
#[derive(Clone)]
pub struct PredictorMetrics {
    _private: (),
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictorMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn observe_training_latency(&self, duration_secs: f64) {
        self.inner().training_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors_total.inc();
    }

    pub fn inc_training_runs(&self) {
        self.inner().training_runs_total.inc();
    }

    pub fn inc_training_errors(&self) {
        self.inner().training_errors_total.inc();
    }

    pub fn set_dataset_rows(&self, rows: i64) {
        self.inner().dataset_rows.set(rows);
    }

    /// Update model info labels, clearing the previous values
    pub fn set_model_info(&self, model: &str, trained_at: &str) {
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[model, trained_at])
            .set(1.0);
    }
}

/// Structured logger for service events
///
/// Emits consistent JSON-formatted records for predictions, training runs,
/// and lifecycle events.
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, version: &str, model: &str) {
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            model = %model,
            "Prediction service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Prediction service shutting down"
        );
    }

    pub fn log_prediction(
        &self,
        project_id: Option<&str>,
        delay_days: f64,
        additional_cost_usd: f64,
        confidence_pct: f64,
    ) {
        info!(
            event = "prediction_generated",
            service = %self.service,
            project_id = project_id.unwrap_or("unknown"),
            delay_days = delay_days,
            additional_cost_usd = additional_cost_usd,
            confidence_pct = confidence_pct,
            "Generated delay prediction"
        );
    }

    pub fn log_training_completed(
        &self,
        rows: usize,
        delay_mae: f64,
        cost_mae: f64,
        elapsed_secs: f64,
    ) {
        info!(
            event = "model_trained",
            service = %self.service,
            rows = rows,
            delay_mae = delay_mae,
            cost_mae = cost_mae,
            elapsed_secs = elapsed_secs,
            "Model training completed"
        );
    }

    pub fn log_training_failed(&self, reason: &str) {
        warn!(
            event = "training_failed",
            service = %self.service,
            reason = %reason,
            "Model training failed, keeping previous model"
        );
    }
}
