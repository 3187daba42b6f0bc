mod commands;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use marketscope_core::{AnalysisType, Catalog};
use marketscope_orchestrator::InsightPipeline;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "marketscope")]
#[command(about = "Market, user and competitor insight reports for a website")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one analysis and print the report as JSON
    Analyze {
        /// Absolute http(s) URL of the site to analyse
        url: String,
        /// Analysis scope: market, user, competitor, or full
        #[arg(long = "type", default_value = "full")]
        analysis_type: AnalysisType,
        /// Print single-line JSON instead of indented output
        #[arg(long)]
        compact: bool,
    },
    /// Print the market category a URL maps to
    Classify { url: String },
    /// List catalog categories and their classifier keywords
    Catalog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = marketscope_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = Arc::new(Catalog::load_or_builtin(config.catalog_path.as_deref())?);

    match cli.command {
        Commands::Analyze {
            url,
            analysis_type,
            compact,
        } => {
            let pipeline = InsightPipeline::from_config(&config, catalog)?;
            let report = commands::build_report(&pipeline, &url, analysis_type).await?;
            println!("{}", commands::render_report(&report, compact)?);
        }
        Commands::Classify { url } => println!("{}", commands::classify_line(&catalog, &url)),
        Commands::Catalog => print!("{}", commands::render_catalog(&catalog)),
    }

    Ok(())
}
