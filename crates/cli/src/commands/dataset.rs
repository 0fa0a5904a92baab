//! Dataset generation command

use anyhow::Result;
use predictor_lib::dataset::{self, DatasetGenerator, DatasetSummary};
use tabled::Tabled;

use crate::output::{format_currency, format_days, print_success, print_table, OutputFormat};

/// Row for the feature/delay correlation table
#[derive(Tabled, serde::Serialize)]
struct CorrelationRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Correlation with delay")]
    correlation: String,
}

pub fn generate(count: usize, output: &str, seed: u64, format: OutputFormat) -> Result<()> {
    let rows = DatasetGenerator::new(seed).generate(count);
    dataset::write_csv(output, &rows)?;

    let summary = DatasetSummary::from_rows(&rows);
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            print_success(&format!("Generated {} projects into {}", summary.rows, output));
            println!(
                "Average delay: {}   Average additional cost: {}",
                format_days(summary.mean_delay_days),
                format_currency(summary.mean_additional_cost_usd)
            );

            let correlation_rows: Vec<CorrelationRow> = summary
                .delay_correlations
                .iter()
                .map(|(feature, correlation)| CorrelationRow {
                    feature: feature.clone(),
                    correlation: format!("{:+.3}", correlation),
                })
                .collect();
            print_table(&correlation_rows, format);
        }
    }

    Ok(())
}
