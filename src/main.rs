//! TagRelay - message intake with LLM tag and summary enrichment
//!
//! Runs one of the TagRelay HTTP services per invocation.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tagrelay::{
    api,
    config::TagRelayConfig,
    enrichment::{enrichment_router, ChatCompletionBackend, EnrichmentState},
    intake::{intake_router, EnrichmentClient, IntakeState, RecordStore},
    messenger::{messenger_router, MessengerState},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tagrelay")]
#[command(version)]
#[command(about = "Message intake with LLM tag and summary enrichment")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "TAGRELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the intake service (POST /new, GET /get)
    Intake {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Enrichment service endpoint
        #[arg(long, env = "TAGRELAY_ENRICHMENT_URL")]
        enrichment_url: Option<String>,
    },

    /// Start the enrichment service (POST /)
    Enrich {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Start the Messenger webhook (GET/POST /webhook)
    Messenger {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let config = match &cli.config {
        Some(path) => TagRelayConfig::from_file(path)?,
        None => TagRelayConfig::default(),
    };

    match cli.command {
        Commands::Intake {
            host,
            port,
            enrichment_url,
        } => {
            let mut config = config;
            if let Some(host) = host {
                config.intake.host = host;
            }
            if let Some(port) = port {
                config.intake.port = port;
            }
            if let Some(url) = enrichment_url {
                config.intake.enrichment_url = url;
            }
            run_intake(config).await?;
        }
        Commands::Enrich { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.enrichment.host = host;
            }
            if let Some(port) = port {
                config.enrichment.port = port;
            }
            run_enrichment(config).await?;
        }
        Commands::Messenger { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.messenger.host = host;
            }
            if let Some(port) = port {
                config.messenger.port = port;
            }
            run_messenger(config).await?;
        }
        Commands::Config { default } => {
            let shown = if default {
                TagRelayConfig::default()
            } else {
                config
            };
            println!("{}", shown.to_toml()?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("tagrelay={},tower_http=debug", log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_intake(config: TagRelayConfig) -> Result<()> {
    let intake = config.intake;
    tracing::info!(
        enrichment_url = %intake.enrichment_url,
        "Starting intake service"
    );

    let state = IntakeState {
        store: RecordStore::new(),
        enrichment: EnrichmentClient::new(&intake.enrichment_url, intake.request_timeout())?,
    };
    let app = api::build_app(intake_router(state), &config.cors_origins);

    api::serve(app, &intake.host, intake.port).await?;
    Ok(())
}

async fn run_enrichment(config: TagRelayConfig) -> Result<()> {
    let enrichment = config.enrichment;
    tracing::info!(
        model = %enrichment.model.model,
        max_tokens = enrichment.model.max_tokens,
        "Starting enrichment service"
    );

    let backend = ChatCompletionBackend::from_env(&enrichment.model)?;
    let state = EnrichmentState {
        backend: Arc::new(backend),
    };
    let app = api::build_app(enrichment_router(state), &config.cors_origins);

    api::serve(app, &enrichment.host, enrichment.port).await?;
    Ok(())
}

async fn run_messenger(config: TagRelayConfig) -> Result<()> {
    let messenger = config.messenger;
    let verify_token = messenger.resolve_verify_token();
    if verify_token.is_none() {
        tracing::warn!(
            env = %messenger.verify_token_env,
            "No verify token configured; webhook verification will be rejected"
        );
    }

    let state = MessengerState {
        verify_token: verify_token.map(Arc::from),
    };
    let app = api::build_app(messenger_router(state), &config.cors_origins);

    api::serve(app, &messenger.host, messenger.port).await?;
    Ok(())
}
