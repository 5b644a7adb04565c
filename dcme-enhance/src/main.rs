//! dcme-enhance - Dublin Core metadata enhancer
//!
//! Enriches digitized-archive metadata records with AI-generated alt text
//! and Iconclass subject classifications, then writes a JSON-LD document.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dcme_common::{filenames, jsonld, EnhancerConfig};
use dcme_enhance::loader;
use dcme_enhance::pipeline::EnhancePipeline;
use dcme_enhance::services::chat_client::ChatClient;

const DEFAULT_METADATA_SOURCE: &str =
    "https://forschung.stadtgeschichtebasel.ch/assets/data/metadata.json";

/// Command-line arguments for dcme-enhance
#[derive(Parser, Debug)]
#[command(name = "dcme-enhance")]
#[command(about = "Enhance Dublin Core metadata with alt text and Iconclass subjects")]
#[command(version)]
struct Args {
    /// Metadata source: local JSON file or http(s) URL
    #[arg(short, long, env = "DCME_SOURCE", default_value = DEFAULT_METADATA_SOURCE)]
    source: String,

    /// Output file (defaults to a timestamped name derived from the source)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Output and log filenames are derived together so a run's artifacts
    // share a timestamp
    let (output_path, log_path) = match &args.output {
        Some(output) => (output.clone(), PathBuf::from(filenames::log_for_output(output))),
        None => {
            let (output, log) = filenames::generate(&args.source, "enhanced");
            (PathBuf::from(output), PathBuf::from(log))
        }
    };

    // Initialize tracing: console plus per-run log file
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dcme_enhance=info,dcme_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    info!("Starting dcme-enhance");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Fatal configuration check before any record is touched
    let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
        anyhow!(
            "OPENAI_API_KEY environment variable is required.\n\
             Set your API key: export OPENAI_API_KEY='your-api-key-here'"
        )
    })?;

    let config = EnhancerConfig::from_env();
    info!(
        top_k = config.top_k,
        lang = %config.lang,
        validate = config.validate,
        classify_enabled = config.classify_enabled,
        search_configured = config.search_url.is_some(),
        "Configuration resolved"
    );

    let chat = Arc::new(ChatClient::new(api_key).context("Failed to create chat client")?);

    info!("Loading metadata from {}", args.source);
    let records = loader::load_records(&args.source)
        .await
        .context("Failed to load metadata")?;
    info!("Loaded {} records", records.len());

    let pipeline = EnhancePipeline::new(config, chat);
    let results = pipeline.run(&records).await;

    info!("Formatting {} enhanced records as JSON-LD", results.len());
    let document = jsonld::format_output(&results);
    let serialized = serde_json::to_string_pretty(&document)?;
    std::fs::write(&output_path, serialized)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!(
        "Enhanced {} records, output: {}, log: {}",
        results.len(),
        output_path.display(),
        log_path.display()
    );

    Ok(())
}
