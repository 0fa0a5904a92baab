//! Model inspection and health commands

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, HealthResponse, ImportanceResponse, ModelInfoResponse};
use crate::output::{color_status, print_info, print_table, OutputFormat};

/// Row for the model metrics table
#[derive(Tabled, serde::Serialize)]
struct MetricsRow {
    #[tabled(rename = "Target")]
    target: &'static str,
    #[tabled(rename = "MAE")]
    mae: String,
    #[tabled(rename = "RMSE")]
    rmse: String,
    #[tabled(rename = "R²")]
    r2: String,
}

/// Row for the feature importance table
#[derive(Tabled, serde::Serialize)]
struct ImportanceRow {
    #[tabled(rename = "Model")]
    model: &'static str,
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Importance")]
    importance: String,
}

pub async fn info(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let info: ModelInfoResponse = client.get("/model-info").await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                "model_name": info.model_name,
                "feature_count": info.feature_count,
                "features": info.features,
                "delay_estimators": info.delay_estimators,
                "cost_estimators": info.cost_estimators,
                "report": info.report,
            }))?);
        }
        OutputFormat::Table => {
            let trained_at = chrono::DateTime::parse_from_rfc3339(&info.report.trained_at)
                .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|_| info.report.trained_at.clone());
            print_info(&format!(
                "{} ({} features, trained {} on {} projects)",
                info.model_name, info.feature_count, trained_at, info.report.rows
            ));

            let rows = vec![
                MetricsRow {
                    target: "delay",
                    mae: format!("{:.2}", info.report.delay.mae),
                    rmse: format!("{:.2}", info.report.delay.rmse),
                    r2: format!("{:.3}", info.report.delay.r2),
                },
                MetricsRow {
                    target: "cost",
                    mae: format!("{:.2}", info.report.cost.mae),
                    rmse: format!("{:.2}", info.report.cost.rmse),
                    r2: format!("{:.3}", info.report.cost.r2),
                },
            ];
            print_table(&rows, format);
        }
    }

    Ok(())
}

pub async fn importance(client: &ApiClient, top_n: usize, format: OutputFormat) -> Result<()> {
    let path = format!("/feature-importance?top_n={}", top_n);
    let response: ImportanceResponse = client.get(&path).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                "model_name": response.model_name,
                "delay_importance": response.delay_importance,
                "cost_importance": response.cost_importance,
            }))?);
        }
        OutputFormat::Table => {
            let mut rows = Vec::new();
            for item in &response.delay_importance {
                rows.push(ImportanceRow {
                    model: "delay",
                    feature: item.feature.clone(),
                    importance: format!("{:.4}", item.importance),
                });
            }
            for item in &response.cost_importance {
                rows.push(ImportanceRow {
                    model: "cost",
                    feature: item.feature.clone(),
                    importance: format!("{:.4}", item.importance),
                });
            }
            print_table(&rows, format);
        }
    }

    Ok(())
}

pub async fn health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health: HealthResponse = client.get("/health").await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                "status": health.status,
                "model_loaded": health.model_loaded,
                "model_name": health.model_name,
            }))?);
        }
        OutputFormat::Table => {
            println!(
                "{}  model_loaded={}  model={}",
                color_status(&health.status),
                health.model_loaded,
                health.model_name
            );
        }
    }

    Ok(())
}
