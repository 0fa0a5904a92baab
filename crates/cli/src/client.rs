//! API client for the delay prediction server

use anyhow::{Context, Result};
use predictor_lib::train::FeatureImportance;
use predictor_lib::{ConfidenceInterval, FeatureVector, ProjectRecord, TrainingReport};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

/// HTTP client for the prediction API
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }
}

// API request/response types

#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub project: ProjectRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionBody {
    pub delay_days: f64,
    pub additional_cost_usd: f64,
    pub confidence_percentage: f64,
    pub delay_interval: ConfidenceInterval,
    pub cost_interval: ConfidenceInterval,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction: PredictionBody,
    pub features_used: FeatureVector,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfoResponse {
    pub model_name: String,
    pub feature_count: usize,
    pub features: Vec<String>,
    pub delay_estimators: usize,
    pub cost_estimators: usize,
    pub report: TrainingReport,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportanceResponse {
    pub model_name: String,
    pub delay_importance: Vec<FeatureImportance>,
    pub cost_importance: Vec<FeatureImportance>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_parses_health_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"healthy","model_loaded":true,"model_name":"random_forest+gradient_boosting"}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let health: HealthResponse = client.get("/health").await.unwrap();

        assert_eq!(health.status, "healthy");
        assert!(health.model_loaded);
    }

    #[tokio::test]
    async fn test_error_status_becomes_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/model-info")
            .with_status(500)
            .with_body(r#"{"success":false,"error":"boom"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let result: Result<ModelInfoResponse> = client.get("/model-info").await;

        let message = result.unwrap_err().to_string();
        assert!(message.contains("500"));
    }

    #[tokio::test]
    async fn test_post_sends_project_payload() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"project":{"location":"Delhi"}}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "success": true,
                    "prediction": {
                        "delay_days": 12.5,
                        "additional_cost_usd": 80000.0,
                        "confidence_percentage": 85.0,
                        "delay_interval": {"lower": 8.0, "upper": 17.0},
                        "cost_interval": {"lower": 60000.0, "upper": 100000.0}
                    },
                    "features_used": {
                        "progress_efficiency": 0.8,
                        "resource_availability": 0.5,
                        "project_complexity": 0.1,
                        "weather_impact": 0.8,
                        "timeline_pressure": 0.4
                    }
                }"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let request = PredictRequest {
            project: ProjectRecord {
                location: Some("Delhi".to_string()),
                ..ProjectRecord::default()
            },
        };
        let response: PredictResponse = client.post("/predict", &request).await.unwrap();

        assert!(response.success);
        assert_eq!(response.prediction.delay_days, 12.5);
        assert_eq!(response.features_used.weather_impact, 0.8);
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
