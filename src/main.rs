mod analysis;
mod classifier;
mod config;
mod conversation;
mod embeddings;
mod entity;
mod error;
mod judge;
mod metrics;
mod scheduler;
mod service;
mod store;
#[cfg(test)]
mod testing;

use analysis::{AnalysisOutcome, Analyzer};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use classifier::{EMOTION_ANCHORS, EMPATHY_ANCHORS, PrototypeClassifier};
use conversation::ConversationUpload;
use error::ServiceError;
use serde::Serialize;
use service::AnalysisService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Multi-metric quality scoring for recorded assistant conversations.
#[derive(Parser, Debug)]
#[command(name = "convoscore", version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the scheduled batch analysis until Ctrl-C
    Serve,
    /// Analyze every stored conversation once
    Batch,
    /// Analyze one conversation and print its report
    Analyze { id: i64 },
    /// Import a conversation from a JSON upload file
    Import { file: PathBuf },
    /// List stored conversations
    List {
        /// Include each conversation's messages
        #[arg(long)]
        messages: bool,
    },
    /// List stored analysis records
    Analyses,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn build_service(config: &config::Config) -> Result<Arc<AnalysisService>> {
    let store = store::ConversationStore::new(&config.storage.data_dir).await?;

    let embeddings = embeddings::create_embedding_service(config)?;
    let sharpness = config.analysis.classifier_sharpness;
    let emotion = PrototypeClassifier::build("emotion", embeddings.clone(), EMOTION_ANCHORS)
        .await?
        .with_sharpness(sharpness);
    let empathy = PrototypeClassifier::build("empathy", embeddings.clone(), EMPATHY_ANCHORS)
        .await?
        .with_sharpness(sharpness);
    let judge = judge::create_judge(config)?;

    let analyzer = Analyzer::new(
        embeddings,
        Arc::new(emotion),
        Arc::new(empathy),
        judge,
        config.analysis.resolution_threshold,
    );
    Ok(AnalysisService::new(
        store,
        Arc::new(analyzer),
        config.analysis.batch_concurrency,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();
    let config = config::Config::from_file(&cli.config)?;

    match cli.command {
        Command::List { messages } => {
            let store = store::ConversationStore::new(&config.storage.data_dir).await?;
            print_json(&store.list_conversations(messages).await?)?;
        }
        Command::Analyses => {
            let store = store::ConversationStore::new(&config.storage.data_dir).await?;
            print_json(&store.list_analyses().await?)?;
        }
        Command::Import { file } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read upload: {}", file.display()))?;
            let upload: ConversationUpload = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse upload: {}", file.display()))?;
            let conversation = upload.validate()?;
            let store = store::ConversationStore::new(&config.storage.data_dir).await?;
            let id = store.insert_conversation(conversation).await?;
            print_json(&serde_json::json!({ "id": id }))?;
        }
        Command::Analyze { id } => {
            let service = build_service(&config).await?;
            match service.analyze_conversation(id).await {
                Ok(report) => print_json(&report)?,
                Err(e) => {
                    let body = match &e {
                        ServiceError::InsufficientData(_) => {
                            AnalysisOutcome::InsufficientData.to_json()
                        }
                        other => serde_json::json!({ "error": other.to_string() }),
                    };
                    let reply = serde_json::json!({ "status": e.status_code(), "body": body });
                    print_json(&reply)?;
                    std::process::exit(1);
                }
            }
        }
        Command::Batch => {
            let service = build_service(&config).await?;
            print_json(&service.run_batch().await?)?;
        }
        Command::Serve => {
            let service = build_service(&config).await?;
            let scheduler = scheduler::BatchScheduler::new(&config.schedule.cron, service).await?;
            scheduler.start(config.schedule.run_on_start).await?;

            tokio::signal::ctrl_c().await?;
            info!("Shutdown signal received");

            if let Err(e) = scheduler.shutdown().await {
                warn!("Failed to shutdown scheduler: {}", e);
            }
            info!("Shutdown complete");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_messages_flag() {
        let cli = Cli::try_parse_from(["convoscore", "list", "--messages"]).unwrap();
        assert!(matches!(cli.command, Command::List { messages: true }));

        let cli = Cli::try_parse_from(["convoscore", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List { messages: false }));
    }
}
