use burrow_gateway::config::Cli;
use burrow_gateway::{server, telemetry};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();

    telemetry::init(config.env)?;

    info!(
        env = %config.env,
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        alias_length = config.alias_length.get(),
        "starting burrow"
    );

    server::run(config).await
}
