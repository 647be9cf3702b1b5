use anyhow::Result;
use clap::Parser;
use moodwave_server::{run_server, CliArgs, ServerConfig, Services};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let config = cli_args.resolve()?;
    info!("Resolved configuration, data in {:?}", config.db_dir);

    let services = Services::build(&config)?;

    info!("Ready to serve at port {}!", config.port);
    run_server(ServerConfig::from(&config), services).await
}
