// Entry point for the company research CLI

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use company_research::analyze::{build_app, AnalyzeClient, AnalyzeService, DEFAULT_ANALYZE_ENDPOINT};
use company_research::collector::{self, DEFAULT_COMPANIES};
use company_research::config::{load_env_files, Config};
use company_research::exporter::DEFAULT_OUTPUT;
use company_research::CompanyFetcher;
use serde_json::{Map, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "company-research")]
#[command(about = "Collect company facts from a language model and analyze companies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the model for each company and write a spreadsheet
    Collect {
        /// Company names (defaults to Apple, Microsoft, Amazon)
        companies: Vec<String>,

        /// Output workbook path
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },

    /// Ask the analysis endpoint a question about a company
    Analyze {
        company: String,
        query: String,

        /// Extra context as a JSON object
        #[arg(long)]
        context: Option<String>,

        #[arg(long, env = "ANALYZE_ENDPOINT", default_value = DEFAULT_ANALYZE_ENDPOINT)]
        endpoint: String,
    },

    /// Run the analysis HTTP service
    Serve {
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env_files();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,company_research=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Collect { companies, output } => {
            let config = Config::from_env().context("Failed to load configuration")?;
            let fetcher =
                CompanyFetcher::new(Arc::new(config.chat_client()), &config.research_model);

            let companies: Vec<String> = if companies.is_empty() {
                DEFAULT_COMPANIES.iter().map(|c| c.to_string()).collect()
            } else {
                companies
            };

            let summary = collector::run(&fetcher, companies.as_slice(), &output)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;

            println!(
                "Data written to {} ({} of {} companies)",
                output.display(),
                summary.rows_written,
                summary.attempted
            );
        }

        Commands::Analyze {
            company,
            query,
            context,
            endpoint,
        } => {
            let context = context
                .map(|raw| serde_json::from_str::<Map<String, Value>>(&raw))
                .transpose()
                .context("--context must be a JSON object")?;

            let response = AnalyzeClient::new(endpoint)
                .analyze(&company, &query, context)
                .await
                .context("Analysis request failed")?;

            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::Serve { port } => {
            let config = Config::from_env().context("Failed to load configuration")?;
            let service = AnalyzeService::new(Arc::new(config.chat_client()), &config.analyze_model);
            let app = build_app(service);

            let addr = format!("0.0.0.0:{}", port.unwrap_or(config.port));
            tracing::info!("Starting analysis service on {}", addr);

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .context("Failed to bind to address")?;

            axum::serve(listener, app).await.context("Server error")?;
        }
    }

    Ok(())
}
