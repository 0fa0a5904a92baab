//! Local training command

use anyhow::{Context, Result};
use predictor_lib::{artifact, dataset, Trainer};
use tabled::Tabled;

use crate::output::{print_success, print_table, OutputFormat};

/// Row for the per-model metrics table
#[derive(Tabled, serde::Serialize)]
struct MetricsRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "MAE")]
    mae: String,
    #[tabled(rename = "RMSE")]
    rmse: String,
    #[tabled(rename = "R²")]
    r2: String,
    #[tabled(rename = "CV MAE")]
    cv_mae: String,
}

pub fn train(dataset_path: &str, output: &str, format: OutputFormat) -> Result<()> {
    let rows = dataset::read_csv(dataset_path)
        .with_context(|| format!("failed to read dataset {}", dataset_path))?;

    let predictor = Trainer::default().train(&rows)?;
    artifact::save(&predictor, output)?;

    let report = &predictor.report;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Table => {
            print_success(&format!(
                "Trained on {} projects, artifact saved to {}",
                report.rows, output
            ));

            let metrics_rows = vec![
                MetricsRow {
                    model: "delay (random forest)".to_string(),
                    mae: format!("{:.2}", report.delay.mae),
                    rmse: format!("{:.2}", report.delay.rmse),
                    r2: format!("{:.3}", report.delay.r2),
                    cv_mae: report
                        .delay
                        .cv_mae
                        .map(|v| format!("{:.2}", v))
                        .unwrap_or_else(|| "-".to_string()),
                },
                MetricsRow {
                    model: "cost (gradient boosting)".to_string(),
                    mae: format!("{:.2}", report.cost.mae),
                    rmse: format!("{:.2}", report.cost.rmse),
                    r2: format!("{:.3}", report.cost.r2),
                    cv_mae: "-".to_string(),
                },
            ];
            print_table(&metrics_rows, format);
        }
    }

    Ok(())
}
