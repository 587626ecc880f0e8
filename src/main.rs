use clap::Parser;
use clap::Subcommand;
use newsrag::api;
use newsrag::config::AppConfig;
use newsrag::logging;
use newsrag::Result;
use tracing::info;

#[derive(Parser)]
#[command(name = "newsrag")]
#[command(about = "News-article RAG question answering service")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run a one-shot RAG query and print the answer payload as JSON
    Query {
        /// The question to ask
        question: String,
    },
    /// Validate configuration and report resolved provider endpoints
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    logging::init_logging(&level)?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            api::serve_api(&config).await
        }
        Commands::Query { question } => {
            config.validate()?;
            let state = api::init_state(&config)?;
            let payload = state.pipeline.run_query(&question).await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
        Commands::CheckConfig => {
            config.validate()?;
            info!("Configuration OK");
            println!("redis:      {}", config.redis.resolve_url());
            println!("qdrant:     {}", config.qdrant.resolve_url());
            println!("collection: {}", config.qdrant.collection);
            println!("embeddings: {} ({})", config.embeddings.endpoint, config.embeddings.model);
            println!(
                "generation: {} ({})",
                config.llm.model,
                if config.llm.api_key.is_some() {
                    "configured"
                } else {
                    "fallback mode"
                }
            );
            Ok(())
        }
    }
}
