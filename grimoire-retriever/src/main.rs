use clap::{Parser, Subcommand};
use grimoire_embed::{EmbedConfig, OpenAiEmbeddingProvider};
use grimoire_retriever::extract::FallbackExtractor;
use grimoire_retriever::retrieval::{DEFAULT_TOP_K, IngestionPipeline, QueryPipeline};
use grimoire_retriever::storage::{JsonFileStore, TenantKey, TenantStore};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// A CLI tool to ingest documents into and query the per-tenant knowledge store.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root directory holding the per-tenant knowledge files
    #[arg(short, long, default_value = "./knowledge")]
    root: PathBuf,

    /// Tenant user id
    #[arg(short, long, default_value_t = 1)]
    user: u64,

    /// Tenant session id
    #[arg(short, long, default_value_t = 1)]
    session: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract, chunk, embed, and store a document
    Ingest {
        /// File to ingest
        file: PathBuf,
    },
    /// Query the tenant's knowledge and print formatted snippets
    Query {
        /// Natural-language query text
        text: String,
        /// Number of snippets to return
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Show how many documents and chunks the tenant has stored
    Stats,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn embed_config_from_env() -> anyhow::Result<EmbedConfig> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY must be set"))?;
    let api_base = std::env::var("OPENAI_API_BASE")
        .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
    let model = std::env::var("EMBEDDING_MODEL")
        .unwrap_or_else(|_| "text-embedding-3-small".to_string());
    let dimension = match std::env::var("EMBEDDING_DIMENSION") {
        Ok(raw) => raw.parse()?,
        Err(_) => 1536,
    };
    Ok(EmbedConfig::new(api_base, api_key, model, dimension))
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let store = Arc::new(JsonFileStore::new(&args.root));
    let key = TenantKey::new(args.user, args.session);

    match args.command {
        Commands::Ingest { file } => {
            let provider = Arc::new(OpenAiEmbeddingProvider::new(embed_config_from_env()?)?);
            // An exhausted extraction chain becomes empty input, which the
            // pipeline rejects with its own typed error.
            let text = match FallbackExtractor::plain_text().extract(&file).await {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(%err, "extraction produced no text");
                    String::new()
                }
            };
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());

            let pipeline = IngestionPipeline::new(store, provider);
            let document_id = pipeline
                .ingest(&text, &file.display().to_string(), &name, key)
                .await?;
            println!("Ingested {name} as document {document_id}");
            Ok(())
        }
        Commands::Query { text, top_k } => {
            let provider = Arc::new(OpenAiEmbeddingProvider::new(embed_config_from_env()?)?);
            let pipeline = QueryPipeline::new(store, provider);
            println!("{}", pipeline.query(&text, key, top_k).await);
            Ok(())
        }
        Commands::Stats => {
            let collection = store.load(key).await?;
            println!(
                "{key}: {} documents, {} chunks",
                collection.documents.len(),
                collection.chunk_count()
            );
            Ok(())
        }
    }
}
