//! Core data models for the delay predictor

use serde::{Deserialize, Serialize};

/// Number of engineered features consumed by the regressors
pub const NUM_FEATURES: usize = 5;

/// Engineered feature names, in training column order
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "progress_efficiency",
    "resource_availability",
    "project_complexity",
    "weather_impact",
    "timeline_pressure",
];

/// Raw project attributes supplied per prediction request.
///
/// Field names follow the project-tracker JSON convention (camelCase).
/// Every field is optional; missing values fall back to fixed defaults
/// during feature extraction. No identity is kept beyond the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectRecord {
    pub id: Option<String>,
    /// Completion percentage in [0, 100]
    pub current_progress: Option<f64>,
    /// ISO-8601 date or datetime
    pub start_date: Option<String>,
    /// ISO-8601 date or datetime
    pub end_date: Option<String>,
    /// Accepts a JSON number or a numeric string
    #[serde(deserialize_with = "deserialize_budget")]
    pub total_budget: Option<f64>,
    pub location: Option<String>,
    pub human_resources: Vec<serde_json::Value>,
    pub materials: Vec<serde_json::Value>,
    pub equipment: Vec<serde_json::Value>,
}

impl ProjectRecord {
    /// Total count of attached resources; only the counts matter for features
    pub fn resource_count(&self) -> usize {
        self.human_resources.len() + self.materials.len() + self.equipment.len()
    }
}

fn deserialize_budget<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawBudget {
        Num(f64),
        Text(String),
    }

    match Option::<RawBudget>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawBudget::Num(n)) => Ok(Some(n)),
        Some(RawBudget::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Engineered feature vector, all values bounded to [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub progress_efficiency: f64,
    pub resource_availability: f64,
    pub project_complexity: f64,
    pub weather_impact: f64,
    pub timeline_pressure: f64,
}

impl FeatureVector {
    /// Values in training column order
    pub fn as_array(&self) -> [f64; NUM_FEATURES] {
        [
            self.progress_efficiency,
            self.resource_availability,
            self.project_complexity,
            self.weather_impact,
            self.timeline_pressure,
        ]
    }

    pub fn from_array(values: [f64; NUM_FEATURES]) -> Self {
        Self {
            progress_efficiency: values[0],
            resource_availability: values[1],
            project_complexity: values[2],
            weather_impact: values[3],
            timeline_pressure: values[4],
        }
    }
}

/// Heuristic confidence interval around a point prediction.
///
/// Derived from ensemble-member variance; not a calibrated statistical
/// guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Prediction output for a single project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayPrediction {
    pub delay_days: f64,
    pub additional_cost_usd: f64,
    pub delay_interval: ConfidenceInterval,
    pub cost_interval: ConfidenceInterval,
    /// Overall confidence score in [60, 95]
    pub confidence_pct: f64,
}

/// One synthetic project in the training dataset.
///
/// Column order matches the CSV layout written by the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRow {
    pub project_id: String,
    pub project_type: String,
    pub location: String,
    pub budget: f64,
    pub planned_duration_days: u32,
    pub current_progress_pct: f64,
    pub time_elapsed_pct: f64,

    // Engineered features (0-1 scale)
    pub progress_efficiency: f64,
    pub resource_availability: f64,
    pub project_complexity: f64,
    pub weather_impact: f64,
    pub timeline_pressure: f64,

    // Target variables
    pub delay_days: f64,
    pub additional_cost_usd: f64,

    // Additional context
    pub progress_variance: f64,
    pub labor_availability: f64,
    pub weather_risk_location: f64,
    pub material_cost_factor: f64,
}

impl DatasetRow {
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            progress_efficiency: self.progress_efficiency,
            resource_availability: self.resource_availability,
            project_complexity: self.project_complexity,
            weather_impact: self.weather_impact,
            timeline_pressure: self.timeline_pressure,
        }
    }
}
