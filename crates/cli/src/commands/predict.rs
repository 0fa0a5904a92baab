//! Prediction command

use anyhow::{Context, Result};
use predictor_lib::ProjectRecord;
use tabled::Tabled;

use crate::client::{ApiClient, PredictRequest, PredictResponse};
use crate::output::{
    color_confidence, format_currency, format_days, format_feature, print_table, OutputFormat,
};

/// Row for the prediction summary table
#[derive(Tabled, serde::Serialize)]
struct PredictionRow {
    #[tabled(rename = "Delay")]
    delay: String,
    #[tabled(rename = "Delay range")]
    delay_range: String,
    #[tabled(rename = "Extra cost")]
    cost: String,
    #[tabled(rename = "Cost range")]
    cost_range: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
}

/// Row for the engineered features table
#[derive(Tabled, serde::Serialize)]
struct FeatureRow {
    #[tabled(rename = "Feature")]
    feature: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

pub async fn predict(client: &ApiClient, file: &str, format: OutputFormat) -> Result<()> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file))?;
    let project: ProjectRecord =
        serde_json::from_str(&content).with_context(|| format!("invalid project JSON in {}", file))?;

    let response: PredictResponse = client
        .post("/predict", &PredictRequest { project })
        .await?;

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "prediction": {
                    "delay_days": response.prediction.delay_days,
                    "additional_cost_usd": response.prediction.additional_cost_usd,
                    "confidence_percentage": response.prediction.confidence_percentage,
                    "delay_interval": response.prediction.delay_interval,
                    "cost_interval": response.prediction.cost_interval,
                },
                "features_used": response.features_used,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Table => {
            let prediction = &response.prediction;
            let rows = vec![PredictionRow {
                delay: format_days(prediction.delay_days),
                delay_range: format!(
                    "{} – {}",
                    format_days(prediction.delay_interval.lower),
                    format_days(prediction.delay_interval.upper)
                ),
                cost: format_currency(prediction.additional_cost_usd),
                cost_range: format!(
                    "{} – {}",
                    format_currency(prediction.cost_interval.lower),
                    format_currency(prediction.cost_interval.upper)
                ),
                confidence: color_confidence(prediction.confidence_percentage),
            }];
            print_table(&rows, format);

            let features = response.features_used;
            let feature_rows: Vec<FeatureRow> = predictor_lib::FEATURE_NAMES
                .iter()
                .copied()
                .zip(features.as_array())
                .map(|(name, value)| FeatureRow {
                    feature: name,
                    value: format_feature(value),
                })
                .collect();
            print_table(&feature_rows, format);
        }
    }

    Ok(())
}
