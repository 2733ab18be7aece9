mod analyze_cmd;
mod provider;
mod status_cmd;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use liftlens_config::{
    apply_env_overrides, config_dir, config_file_path, ensure_valid, load_config, LiftLensConfig,
};
use liftlens_gateway::{start_server, GatewayState};
use liftlens_logging::{init_logger, LogOptions};
use liftlens_media::AnalysisPipeline;

#[derive(Parser)]
#[command(name = "liftlens")]
#[command(about = "LiftLens: workout screenshot analysis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the upload API server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Config file (defaults to ~/.liftlens/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Analyze a screenshot pair without starting the server
    Analyze {
        first: PathBuf,
        second: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Query a running server's health endpoint
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, config } => {
            let mut config = load(config.as_deref()).await?;
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
        }
        Commands::Analyze {
            first,
            second,
            config,
        } => {
            let config = load(config.as_deref()).await?;
            let succeeded = analyze_cmd::run(&config, &first, &second).await?;
            if !succeeded {
                std::process::exit(1);
            }
        }
        Commands::Status { port } => {
            let port = port.unwrap_or(apply_env_overrides(LiftLensConfig::default()).server.port);
            status_cmd::run(port).await?;
        }
    }

    Ok(())
}

/// Load and validate the config, installing the logger it describes.
async fn load(path: Option<&Path>) -> Result<LiftLensConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path(&config_dir()),
    };
    let config = apply_env_overrides(load_config(&path).await?);

    init_logger(&LogOptions {
        level: config.logging.level.clone(),
        dir: config.logging.dir.clone(),
        json: config.logging.json,
    });
    ensure_valid(&config)?;

    Ok(config)
}

async fn run_server(config: LiftLensConfig) -> Result<()> {
    let model = provider::build_model(&config.model)?;
    info!(
        port = config.server.port,
        bind = %config.server.bind_address,
        provider = model.name(),
        "Starting LiftLens"
    );

    let pipeline = AnalysisPipeline::new(model)
        .with_classification_max_tokens(config.model.classification_max_tokens);
    let state = GatewayState::new(Arc::new(pipeline), config.server.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.bind_address))?;

    start_server(addr, state).await
}
