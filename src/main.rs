use anyhow::{Context, Result};
use clap::Parser;
use pubmed_affiliations::classify::Classifier;
use pubmed_affiliations::config::load_config;
use pubmed_affiliations::pipeline::{FailurePolicy, Fetcher, RunOutcome};
use pubmed_affiliations::sources::PubMedSource;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fetch research papers from PubMed and list their company-affiliated authors
#[derive(Parser, Debug)]
#[command(name = "pubmed-affiliations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch research papers from PubMed based on a query", long_about = None)]
struct Cli {
    /// Query to search PubMed
    #[arg(default_value = "pharmaceutical research")]
    query: String,

    /// Output CSV filename
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Enable debugging output
    #[arg(long, short)]
    debug: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of search results
    #[arg(long)]
    max_results: Option<usize>,

    /// Skip records that fail to fetch instead of aborting
    #[arg(long)]
    skip_failed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("pubmed_affiliations={}", level)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = load_config(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load config from environment".to_string(),
    })?;

    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }
    if let Some(max_results) = cli.max_results {
        config.pubmed.max_results = max_results;
    }
    if cli.skip_failed {
        config.fetch.on_record_error = FailurePolicy::Skip;
    }

    let query = if cli.query.is_empty() {
        tracing::info!("No query provided, using default query: 'pharmaceutical research'");
        "pharmaceutical research".to_string()
    } else {
        cli.query
    };
    let output = cli.file.unwrap_or_else(|| config.output.default_path.clone());

    let source = PubMedSource::from_config(&config.pubmed, &config.http)
        .context("Failed to create PubMed client")?;
    let fetcher = Fetcher::new(source)
        .with_classifier(Classifier::from_config(&config.classifier))
        .with_failure_policy(config.fetch.on_record_error);

    match fetcher.run(&query, &output).await? {
        RunOutcome::Written { path, count } => {
            println!("Results saved to {} ({} papers)", path.display(), count);
        }
        RunOutcome::NoIdentifiers | RunOutcome::NoPapers => {}
    }

    Ok(())
}
