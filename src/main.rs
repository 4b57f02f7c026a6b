use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kraft_broker::adapters::incoming::TcpAdapter;
use kraft_broker::adapters::protocol::KafkaProtocolParser;
use kraft_broker::config::{AppConfig, CommandLine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_command_line(CommandLine::parse()).context("failed to read configuration")?;

    // RUST_LOG 가 있으면 -v 보다 우선
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let broker = config
        .build_broker()
        .await
        .with_context(|| format!("failed to load cluster metadata from {}", config.metadata_log.display()))?;

    let adapter = TcpAdapter::new(&config.listen_addr, Arc::new(broker), KafkaProtocolParser::new())
        .await
        .with_context(|| format!("failed to listen on {}", config.listen_addr))?;

    adapter.run().await?;

    Ok(())
}
