use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use signing_rpc_proxy::{Cli, Commands, Config, Server, StartArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Start(args)) => start_server(args).await,
        Some(Commands::CheckConfig(args)) => check_config(args),
        None => start_server(cli.start_args).await,
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.logging.filter())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn start_server(args: StartArgs) -> Result<()> {
    let config = Config::load(args)?;
    init_logging(&config)?;

    info!("Starting signing RPC proxy v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;

    info!("📊 Configuration loaded:");
    for line in config.summary() {
        info!("  {}", line);
    }

    if config.security.allowed_ips.is_empty() {
        warn!("⚠️  No IP restrictions configured - all IPs allowed!");
    }
    if !config.tls.enabled {
        warn!("⚠️  TLS disabled - JSON-RPC traffic is not encrypted");
    }

    let server = Server::new(config).await?;
    server.serve().await?;

    Ok(())
}

fn check_config(args: StartArgs) -> Result<()> {
    let config = Config::load(args)?;
    init_logging(&config)?;

    for line in config.summary() {
        info!("{}", line);
    }

    config.validate()?;
    info!("✅ Configuration is valid");

    Ok(())
}
