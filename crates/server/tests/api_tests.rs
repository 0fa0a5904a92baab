//! Integration tests for the prediction API endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use delay_server::api::{create_router, AppState};
use predictor_lib::{
    dataset::{self, DatasetGenerator},
    health::components,
    train::{BoostingConfig, ForestConfig, TrainingConfig},
    HealthRegistry, PredictorMetrics, StructuredLogger, Trainer,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;

fn quick_training_config() -> TrainingConfig {
    TrainingConfig {
        forest: ForestConfig {
            n_estimators: 15,
            ..ForestConfig::default()
        },
        boosting: BoostingConfig {
            n_estimators: 20,
            ..BoostingConfig::default()
        },
        cv_folds: 0,
        ..TrainingConfig::default()
    }
}

async fn setup_test_app(dir: &tempfile::TempDir) -> (Router, Arc<AppState>) {
    let rows = DatasetGenerator::new(42).generate(120);
    let predictor = Trainer::new(quick_training_config()).train(&rows).unwrap();

    let health = HealthRegistry::new();
    health.register(components::MODEL).await;
    health.register(components::DATASET).await;

    let state = Arc::new(AppState {
        predictor: RwLock::new(predictor),
        health,
        metrics: PredictorMetrics::new(),
        logger: StructuredLogger::new("delay-server-test"),
        model_path: dir.path().join("model.json"),
        dataset_path: dir.path().join("dataset.csv"),
    });
    (create_router(state.clone()), state)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn sample_project() -> serde_json::Value {
    serde_json::json!({
        "id": "PROJ_TEST",
        "currentProgress": 45,
        "startDate": "2024-01-01",
        "endDate": "2024-12-31",
        "totalBudget": "5000000",
        "location": "Delhi",
        "humanResources": [{}, {}, {}],
        "materials": [{}, {}],
        "equipment": [{}]
    })
}

#[tokio::test]
async fn test_health_returns_ok_when_healthy() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = setup_test_app(&dir).await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health = json_body(response).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["model_loaded"], true);
    assert!(health["components"]["model"].is_object());
}

#[tokio::test]
async fn test_health_returns_503_when_model_unhealthy() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = setup_test_app(&dir).await;
    state
        .health
        .set_unhealthy(components::MODEL, "training failed")
        .await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let health = json_body(response).await;
    assert_eq!(health["status"], "unhealthy");
}

#[tokio::test]
async fn test_predict_happy_path() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = setup_test_app(&dir).await;

    let request = post_json("/predict", serde_json::json!({ "project": sample_project() }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);

    let prediction = &body["prediction"];
    assert!(prediction["delay_days"].as_f64().unwrap() >= 0.0);
    assert!(prediction["additional_cost_usd"].as_f64().unwrap() >= 0.0);

    let confidence = prediction["confidence_percentage"].as_f64().unwrap();
    assert!((60.0..=95.0).contains(&confidence));

    let interval = &prediction["delay_interval"];
    assert!(interval["lower"].as_f64().unwrap() <= interval["upper"].as_f64().unwrap());

    let features = &body["features_used"];
    assert_eq!(features["weather_impact"], 0.8); // Delhi
}

#[tokio::test]
async fn test_predict_without_project_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = setup_test_app(&dir).await;

    let request = post_json("/predict", serde_json::json!({}));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_predict_with_malformed_date_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = setup_test_app(&dir).await;

    let mut project = sample_project();
    project["startDate"] = serde_json::json!("not-a-date");
    let request = post_json("/predict", serde_json::json!({ "project": project }));

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_predict_isolates_item_failures() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = setup_test_app(&dir).await;

    let mut bad_project = sample_project();
    bad_project["id"] = serde_json::json!("PROJ_BAD");
    bad_project["endDate"] = serde_json::json!("garbage");

    let request = post_json(
        "/predict/batch",
        serde_json::json!({ "projects": [sample_project(), bad_project] }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["total_projects"], 2);
    assert_eq!(body["successful_predictions"], 1);

    let predictions = body["predictions"].as_array().unwrap();
    assert!(predictions[0]["prediction"].is_object());
    assert!(predictions[1]["error"].is_string());
    assert_eq!(predictions[1]["project_id"], "PROJ_BAD");
}

#[tokio::test]
async fn test_batch_predict_empty_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = setup_test_app(&dir).await;

    let request = post_json("/predict/batch", serde_json::json!({ "projects": [] }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_explain_features_returns_formulas() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = setup_test_app(&dir).await;

    let request = post_json(
        "/features/explain",
        serde_json::json!({ "project": sample_project() }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["features"]["progress_efficiency"].is_number());
    assert!(body["explanations"]["weather_impact"].is_string());
    assert!(body["calculation_details"]["resource_availability"]
        .as_str()
        .unwrap()
        .contains("3 + 2 + 1"));
}

#[tokio::test]
async fn test_model_info_reports_training_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = setup_test_app(&dir).await;

    let response = app.oneshot(get("/model-info")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["model_name"], "random_forest+gradient_boosting");
    assert_eq!(body["feature_count"], 5);
    assert_eq!(body["delay_estimators"], 15);
    assert_eq!(body["report"]["rows"], 120);
    assert!(body["report"]["delay"]["mae"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_feature_importance_respects_top_n() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = setup_test_app(&dir).await;

    let response = app
        .oneshot(get("/feature-importance?top_n=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["delay_importance"].as_array().unwrap().len(), 2);
    assert_eq!(body["cost_importance"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_retrain_swaps_model_and_persists_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = setup_test_app(&dir).await;

    // Stage a fresh dataset at the configured path
    let rows = DatasetGenerator::new(7).generate(80);
    dataset::write_csv(&state.dataset_path, &rows).unwrap();

    let request = post_json("/retrain", serde_json::json!({}));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["rows"], 80);
    assert!(state.model_path.exists());

    let snapshot = state.health.snapshot().await;
    assert_eq!(
        snapshot.components["model"].status,
        predictor_lib::ComponentStatus::Healthy
    );
}

#[tokio::test]
async fn test_retrain_with_missing_dataset_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = setup_test_app(&dir).await;

    let request = post_json(
        "/retrain",
        serde_json::json!({ "dataset_path": "/nonexistent/data.csv" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_prediction_counters() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = setup_test_app(&dir).await;

    // Serve one prediction so counters exist
    let request = post_json("/predict", serde_json::json!({ "project": sample_project() }));
    app.clone().oneshot(request).await.unwrap();

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("delay_predictor_predictions_total"));
    assert!(text.contains("delay_predictor_prediction_latency_seconds_bucket"));
}
