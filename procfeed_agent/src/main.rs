//! Entry point for the procfeed agent. Parses config, connects to the
//! broker, and runs the sampling loop until interrupted.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use procfeed_agent::config;
use procfeed_agent::platform::Platform;
use procfeed_agent::publisher::Publisher;
use procfeed_agent::sampler;
use procfeed_agent::state::SamplerContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = match config::parse_args(std::env::args()) {
        Ok(cfg) => cfg,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let platform = Platform::resolve(cfg.platform.as_deref());
    info!(
        platform = %platform.name,
        queue = %cfg.queue,
        interval_secs = cfg.interval.as_secs_f64(),
        "starting procfeed agent"
    );

    let publisher = Publisher::connect(&cfg.amqp, &cfg.queue)
        .await
        .with_context(|| format!("connecting to broker at {}", cfg.amqp))?;
    let ctx = SamplerContext::new(platform);

    sampler::run(ctx, publisher, &cfg).await?;
    info!("shutdown complete");
    Ok(())
}
