//! `reelforge serve` — Start the HTTP gateway.

use anyhow::Context;
use reelforge_config::StudioConfig;

pub async fn run(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = StudioConfig::load().context("failed to load configuration")?;
    if let Some(port) = port {
        config.gateway.port = port;
    }

    reelforge_gateway::start(config)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))
}
