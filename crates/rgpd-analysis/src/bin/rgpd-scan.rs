//! Command-line front end for document analysis
//!
//! Usage:
//!   rgpd-scan --policy replace --language fr clients.csv contrat.pdf

use anyhow::{bail, Context, Result};
use clap::Parser;
use rgpd_analysis::{
    AnalysisConfig, AnalysisRequest, AnalysisStore, EntityType, MemoryStore, Pipeline, CONFIG_ENV,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Detect and anonymize personal data in documents
#[derive(Parser, Debug)]
#[command(name = "rgpd-scan")]
#[command(about = "Detect and anonymize personal data in PDF, CSV and text files")]
struct Args {
    /// Documents to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Anonymization operator: mask, replace or redact
    #[arg(short, long)]
    policy: Option<String>,

    /// Detection language (fr, en)
    #[arg(short, long)]
    language: Option<String>,

    /// Entity types to detect, comma separated (e.g. EMAIL,PERSON)
    #[arg(short, long, value_delimiter = ',')]
    entities: Option<Vec<String>>,

    /// Declared file type, instead of the file extension
    #[arg(short = 't', long = "type")]
    file_type: Option<String>,

    /// TOML configuration file
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Append audit entries to this file
    #[arg(long)]
    audit_log: Option<PathBuf>,

    /// Print dashboard totals after the analyses
    #[arg(long)]
    stats: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if args.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(labels) = &args.entities {
        config.detector.entities = labels
            .iter()
            .map(|label| label.parse::<EntityType>())
            .collect::<std::result::Result<_, _>>()?;
    }
    if let Some(path) = &args.audit_log {
        config.audit.log_file = Some(path.clone());
    }

    let pipeline = Pipeline::new(config.clone())?;
    let store = MemoryStore::new();
    let mut failures = 0;

    for path in &args.files {
        match analyze_file(&pipeline, &config, &args, path).await {
            Ok(record) => {
                if record.failure().is_some() {
                    failures += 1;
                }
                println!("{}", serde_json::to_string_pretty(&record)?);
                store.persist(record).await?;
            }
            Err(e) => {
                failures += 1;
                error!(file = %path.display(), error = %e, "Rejected");
            }
        }
    }

    if args.stats {
        let stats = store.aggregate_stats().await?;
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    info!(files = args.files.len(), failures, "Done");
    if failures > 0 {
        bail!("{} of {} documents could not be analyzed", failures, args.files.len());
    }
    Ok(())
}

async fn analyze_file(
    pipeline: &Pipeline,
    config: &AnalysisConfig,
    args: &Args,
    path: &Path,
) -> Result<rgpd_analysis::AnalysisResult> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let file_type = args.file_type.clone().unwrap_or_else(|| {
        path.extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default()
    });

    let request = AnalysisRequest::from_upload(
        &file_name,
        bytes,
        &file_type,
        args.policy.as_deref(),
        args.language.as_deref(),
        config,
    )?;
    Ok(pipeline.analyze(request).await?)
}
