//! Planframe node binary.

use planframe_node::{logging, run_server, NodeConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = NodeConfig::from_env()?;
    logging::init(&config.log_filter)?;
    run_server(config).await
}
