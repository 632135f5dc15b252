//! Page OCR
//!
//! Runs the page OCR pipeline on a single image, or serves it over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pageocr_server::config::Config;
use pageocr_server::ocr::{Language, Modality};
use pageocr_server::pipeline::{write_output, PagePipeline, PipelineOptions};
use pageocr_server::routes;
use pageocr_server::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "pageocr")]
#[command(version, about = "Word-level page OCR over remote layout and OCR services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// OCR one page image and write `{text, regions}` JSON
    Run {
        /// Page image path; crops are written next to it
        image: PathBuf,

        /// Output JSON file
        #[arg(short, long, default_value = "out.json")]
        output: PathBuf,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Serve the pipeline over HTTP
    Serve {
        /// Listen port (overrides PAGEOCR_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Per-run overrides of the configured pipeline defaults
#[derive(clap::Args, Debug)]
struct OptionArgs {
    /// Language name (hindi, english, tamil, ...)
    #[arg(short, long)]
    language: Option<Language>,

    /// OCR model version
    #[arg(long)]
    ocr_version: Option<String>,

    /// printed or handwritten
    #[arg(short, long)]
    modality: Option<Modality>,

    /// Layout-detection model
    #[arg(long)]
    model: Option<String>,
}

impl OptionArgs {
    fn apply(self, mut options: PipelineOptions) -> PipelineOptions {
        if let Some(language) = self.language {
            options.language = language;
        }
        if let Some(version) = self.ocr_version {
            options.version = version;
        }
        if let Some(modality) = self.modality {
            options.modality = modality;
        }
        if let Some(model) = self.model {
            options.layout_model = model;
        }
        options
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "pageocr=debug,pageocr_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Invalid PAGEOCR_* configuration")?;

    let cli = Cli::parse();
    let pipeline = PagePipeline::from_config(&config).context("Failed to initialize pipeline")?;

    match cli.command {
        Commands::Run {
            image,
            output,
            options,
        } => {
            let options = options.apply(config.pipeline.clone());
            tracing::info!(
                image = %image.display(),
                language = %options.language,
                version = %options.version,
                modality = %options.modality,
                model = %options.layout_model,
                "Starting page OCR"
            );

            let response = pipeline
                .run(&image, &options)
                .await
                .with_context(|| format!("Page OCR failed for {}", image.display()))?;

            write_output(&output, &response).await?;
        }
        Commands::Serve { port } => {
            serve(config, pipeline, port).await?;
        }
    }

    Ok(())
}

async fn serve(config: Config, pipeline: PagePipeline, port: Option<u16>) -> Result<()> {
    tokio::fs::create_dir_all(&config.server.work_dir)
        .await
        .with_context(|| format!("Failed to create work dir {}", config.server.work_dir.display()))?;

    tracing::info!("Starting Page OCR Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Layout service: {}", config.services.layout_url);
    tracing::info!("OCR service: {}", config.services.ocr_url);

    let addr = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(config.server.port)));
    let app = routes::app(AppState::new(config, pipeline));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Page OCR Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
