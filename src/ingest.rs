use clap::Parser;
use health_assistant::application::IndexBuilder;
use health_assistant::domain::ports::IndexRepository;
use health_assistant::infrastructure::{
    knowledge_base, telemetry, AppConfig, HuggingFaceEmbedding, JsonIndexRepository,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Builds the assistant's vector index from a directory of text files.
#[derive(Parser, Debug)]
#[command(name = "ingest", version)]
struct Args {
    /// Directory holding `.txt` / `.md` knowledge-base files.
    #[arg(short, long)]
    source: PathBuf,

    /// Where to write the index. Defaults to `rag.index_path`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum characters per chunk. Defaults to `rag.chunk_size`.
    #[arg(long)]
    chunk_size: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("ingest=info,health_assistant=info");

    let args = Args::parse();
    let config = AppConfig::load()?;
    let rag = &config.config.rag;

    let sources = knowledge_base::collect_sources(&args.source).await?;
    info!(files = sources.len(), "sources collected");

    let embedding = Arc::new(HuggingFaceEmbedding::from_config(&config.config.embedding));
    let builder =
        IndexBuilder::new(embedding).with_chunk_size(args.chunk_size.unwrap_or(rag.chunk_size));

    let index = builder
        .build(sources.iter().map(|(n, c)| (n.as_str(), c.as_str())))
        .await?;

    let output = args.output.unwrap_or_else(|| PathBuf::from(&rag.index_path));
    JsonIndexRepository::new(&output).save(&index).await?;

    info!(entries = index.len(), path = %output.display(), "index written");
    Ok(())
}
