//! HTTP API for delay predictions, model info, and retraining

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{
    dataset,
    health::{components, ComponentStatus},
    ComponentHealth, ConfidenceInterval, DelayPredictor, FeatureExtractor, FeatureVector,
    HealthRegistry, PredictorError, PredictorMetrics, ProjectRecord, StructuredLogger, Trainer,
    TrainingReport,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::info;

/// Shared application state
pub struct AppState {
    /// Read-mostly; /retrain is the only writer
    pub predictor: RwLock<DelayPredictor>,
    pub health: HealthRegistry,
    pub metrics: PredictorMetrics,
    pub logger: StructuredLogger,
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
}

/// Handler-boundary error rendered as a JSON body
pub enum ApiError {
    BadRequest(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(error) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", error))
            }
        };
        let body = serde_json::json!({ "success": false, "error": message });
        (status, Json(body)).into_response()
    }
}

impl From<PredictorError> for ApiError {
    fn from(error: PredictorError) -> Self {
        match error {
            PredictorError::InvalidDate(_)
            | PredictorError::EmptyDataset
            | PredictorError::InsufficientData(_) => ApiError::BadRequest(error.to_string()),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::Internal(error)
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub project: Option<ProjectRecord>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

#[derive(Debug, Deserialize)]
pub struct RetrainRequest {
    pub dataset_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImportanceParams {
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
struct PredictionBody {
    delay_days: f64,
    additional_cost_usd: f64,
    confidence_percentage: f64,
    delay_interval: ConfidenceInterval,
    cost_interval: ConfidenceInterval,
}

#[derive(Debug, Serialize)]
struct ModelInfoBlock {
    model: &'static str,
    feature_count: usize,
    training_rows: usize,
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    success: bool,
    prediction: PredictionBody,
    features_used: FeatureVector,
    model_info: ModelInfoBlock,
    generated_at: i64,
}

#[derive(Debug, Serialize)]
struct BatchItem {
    project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction: Option<PredictionBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct BatchResponse {
    success: bool,
    predictions: Vec<BatchItem>,
    total_projects: usize,
    successful_predictions: usize,
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: ComponentStatus,
    model_loaded: bool,
    model_name: &'static str,
    components: std::collections::HashMap<String, ComponentHealth>,
}

#[derive(Debug, Serialize)]
struct ExplainResponse {
    features: FeatureVector,
    explanations: serde_json::Value,
    calculation_details: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ModelInfoResponse {
    model_name: &'static str,
    feature_count: usize,
    features: Vec<&'static str>,
    delay_estimators: usize,
    cost_estimators: usize,
    report: TrainingReport,
}

#[derive(Debug, Serialize)]
struct RetrainResponse {
    success: bool,
    message: String,
    rows: usize,
    delay_mae: f64,
    cost_mae: f64,
}

fn prediction_body(prediction: &predictor_lib::DelayPrediction) -> PredictionBody {
    PredictionBody {
        delay_days: prediction.delay_days,
        additional_cost_usd: prediction.additional_cost_usd,
        confidence_percentage: prediction.confidence_pct,
        delay_interval: prediction.delay_interval,
        cost_interval: prediction.cost_interval,
    }
}

/// Health check - 200 while operational (degraded included), 503 when not
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.health.snapshot().await;
    let predictor = state.predictor.read().await;

    let status_code = match snapshot.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    let body = HealthBody {
        status: snapshot.status,
        model_loaded: true,
        model_name: predictor.model_name(),
        components: snapshot.components,
    };
    (status_code, Json(body))
}

/// Predict delay and cost for a single project
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let project = request
        .project
        .ok_or_else(|| ApiError::BadRequest("project data required".to_string()))?;

    let started = Instant::now();
    let features = FeatureExtractor::new().extract(&project).map_err(|e| {
        state.metrics.inc_prediction_errors();
        ApiError::from(e)
    })?;

    let predictor = state.predictor.read().await;
    let prediction = predictor.predict(&features);

    state
        .metrics
        .observe_prediction_latency(started.elapsed().as_secs_f64());
    state.metrics.inc_predictions();
    state.logger.log_prediction(
        project.id.as_deref(),
        prediction.delay_days,
        prediction.additional_cost_usd,
        prediction.confidence_pct,
    );

    Ok(Json(PredictResponse {
        success: true,
        prediction: prediction_body(&prediction),
        features_used: features,
        model_info: ModelInfoBlock {
            model: predictor.model_name(),
            feature_count: features.as_array().len(),
            training_rows: predictor.report.rows,
        },
        generated_at: chrono::Utc::now().timestamp(),
    }))
}

/// Predict for a batch of projects; per-item failures are not fatal
async fn predict_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    if request.projects.is_empty() {
        return Err(ApiError::BadRequest("projects array required".to_string()));
    }

    let extractor = FeatureExtractor::new();
    let predictor = state.predictor.read().await;
    let mut items = Vec::with_capacity(request.projects.len());

    for (index, project) in request.projects.iter().enumerate() {
        let project_id = project
            .id
            .clone()
            .unwrap_or_else(|| format!("project_{}", index));

        match extractor.extract(project) {
            Ok(features) => {
                let prediction = predictor.predict(&features);
                state.metrics.inc_predictions();
                items.push(BatchItem {
                    project_id,
                    prediction: Some(prediction_body(&prediction)),
                    error: None,
                });
            }
            Err(error) => {
                state.metrics.inc_prediction_errors();
                items.push(BatchItem {
                    project_id,
                    prediction: None,
                    error: Some(error.to_string()),
                });
            }
        }
    }

    let successful = items.iter().filter(|i| i.prediction.is_some()).count();
    Ok(Json(BatchResponse {
        success: true,
        total_projects: items.len(),
        successful_predictions: successful,
        predictions: items,
    }))
}

/// Explain how features are derived from project data
async fn explain_features(
    Json(request): Json<PredictRequest>,
) -> Result<Json<ExplainResponse>, ApiError> {
    let project = request.project.unwrap_or_default();
    let features = FeatureExtractor::new().extract(&project)?;

    let explanations = serde_json::json!({
        "progress_efficiency": "Based on actual vs expected progress given timeline",
        "resource_availability": "Calculated from resource count and budget allocation",
        "project_complexity": "Derived from budget size and resource complexity",
        "weather_impact": "Location-based weather risk assessment",
        "timeline_pressure": "Urgency based on remaining time and completion status",
    });

    let calculation_details = serde_json::json!({
        "progress_efficiency": format!(
            "Current: {}%, timeline analysis",
            project.current_progress.unwrap_or(0.0)
        ),
        "resource_availability": format!(
            "Resources: {} + {} + {}",
            project.human_resources.len(),
            project.materials.len(),
            project.equipment.len()
        ),
        "project_complexity": format!("Budget: ${}", project.total_budget.unwrap_or(0.0)),
        "weather_impact": format!(
            "Location: {}",
            project.location.as_deref().unwrap_or("Unknown")
        ),
        "timeline_pressure": "Timeline vs progress analysis",
    });

    Ok(Json(ExplainResponse {
        features,
        explanations,
        calculation_details,
    }))
}

/// Describe the loaded model and its training report
async fn model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfoResponse> {
    let predictor = state.predictor.read().await;
    Json(ModelInfoResponse {
        model_name: predictor.model_name(),
        feature_count: predictor.feature_names().len(),
        features: predictor.feature_names().to_vec(),
        delay_estimators: predictor.delay_estimators(),
        cost_estimators: predictor.cost_estimators(),
        report: predictor.report.clone(),
    })
}

/// Ranked feature importances for both models
async fn feature_importance(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ImportanceParams>,
) -> Json<serde_json::Value> {
    let predictor = state.predictor.read().await;
    let top_n = params.top_n.unwrap_or(20);

    let truncate = |importances: &[predictor_lib::train::FeatureImportance]| {
        importances.iter().take(top_n).cloned().collect::<Vec<_>>()
    };

    Json(serde_json::json!({
        "model_name": predictor.model_name(),
        "delay_importance": truncate(&predictor.report.delay_importance),
        "cost_importance": truncate(&predictor.report.cost_importance),
    }))
}

/// Retrain from the configured (or supplied) dataset and swap the model
async fn retrain(
    State(state): State<Arc<AppState>>,
    request: Option<Json<RetrainRequest>>,
) -> Result<Json<RetrainResponse>, ApiError> {
    let dataset_path = request
        .and_then(|Json(r)| r.dataset_path)
        .map(PathBuf::from)
        .unwrap_or_else(|| state.dataset_path.clone());

    if !dataset_path.exists() {
        return Err(ApiError::BadRequest(format!(
            "dataset file not found: {}",
            dataset_path.display()
        )));
    }

    info!(dataset = %dataset_path.display(), "Retraining model");
    let started = Instant::now();
    let rows = dataset::read_csv(&dataset_path)?;

    let trained = tokio::task::spawn_blocking(move || Trainer::default().train(&rows))
        .await
        .context("training task panicked")
        .map_err(|e| {
            state.metrics.inc_training_errors();
            ApiError::Internal(e)
        })?;

    let new_predictor = match trained {
        Ok(predictor) => predictor,
        Err(error) => {
            state.metrics.inc_training_errors();
            state.logger.log_training_failed(&error.to_string());
            state
                .health
                .set_degraded(components::MODEL, "retrain failed, previous model kept")
                .await;
            return Err(ApiError::from(error));
        }
    };

    predictor_lib::artifact::save(&new_predictor, &state.model_path)?;

    let elapsed = started.elapsed().as_secs_f64();
    let report = new_predictor.report.clone();
    {
        let mut predictor = state.predictor.write().await;
        *predictor = new_predictor;
    }

    state.metrics.observe_training_latency(elapsed);
    state.metrics.inc_training_runs();
    state.metrics.set_dataset_rows(report.rows as i64);
    state.health.set_healthy(components::MODEL).await;
    state.health.set_healthy(components::DATASET).await;
    state
        .logger
        .log_training_completed(report.rows, report.delay.mae, report.cost.mae, elapsed);

    Ok(Json(RetrainResponse {
        success: true,
        message: "model retrained successfully".to_string(),
        rows: report.rows,
        delay_mae: report.delay.mae,
        cost_mae: report.cost.mae,
    }))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(error) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            error.to_string().into_bytes(),
        );
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/predict/batch", post(predict_batch))
        .route("/features/explain", post(explain_features))
        .route("/model-info", get(model_info))
        .route("/feature-importance", get(feature_importance))
        .route("/retrain", post(retrain))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
