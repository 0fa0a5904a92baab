//! Construction Delay Predictor CLI
//!
//! A command-line tool for generating training data, training models
//! locally, and querying a running prediction server.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{dataset, model, predict, train};

/// Construction Delay Predictor CLI
#[derive(Parser)]
#[command(name = "cdp")]
#[command(author, version, about = "CLI for the Construction Delay Predictor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via CDP_API_URL env var)
    #[arg(long, env = "CDP_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a synthetic training dataset CSV
    Generate {
        /// Number of projects to generate
        #[arg(long, default_value_t = 2000)]
        count: usize,

        /// Output CSV path
        #[arg(long, short, default_value = "construction_delay_dataset.csv")]
        output: String,

        /// Generator seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Train delay and cost models from a dataset CSV
    Train {
        /// Dataset CSV path
        #[arg(long, short, default_value = "construction_delay_dataset.csv")]
        dataset: String,

        /// Output path for the model artifact
        #[arg(long, short, default_value = "construction_delay_model.json")]
        output: String,
    },

    /// Predict delay and cost for a project JSON file via the server
    Predict {
        /// Path to a JSON file holding the project attributes
        file: String,
    },

    /// Model inspection commands
    #[command(subcommand)]
    Model(ModelCommands),

    /// Check server health
    Health,
}

#[derive(Subcommand)]
pub enum ModelCommands {
    /// Show model info and training metrics
    Info,

    /// Show ranked feature importances
    Importance {
        /// Maximum features to list per model
        #[arg(long, default_value_t = 20)]
        top_n: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let api_url = config::resolve_api_url(cli.api_url.clone());

    match cli.command {
        Commands::Generate {
            count,
            output,
            seed,
        } => {
            dataset::generate(count, &output, seed, cli.format)?;
        }
        Commands::Train { dataset, output } => {
            train::train(&dataset, &output, cli.format)?;
        }
        Commands::Predict { file } => {
            let client = client::ApiClient::new(&api_url)?;
            predict::predict(&client, &file, cli.format).await?;
        }
        Commands::Model(model_cmd) => {
            let client = client::ApiClient::new(&api_url)?;
            match model_cmd {
                ModelCommands::Info => model::info(&client, cli.format).await?,
                ModelCommands::Importance { top_n } => {
                    model::importance(&client, top_n, cli.format).await?;
                }
            }
        }
        Commands::Health => {
            let client = client::ApiClient::new(&api_url)?;
            model::health(&client, cli.format).await?;
        }
    }

    Ok(())
}
