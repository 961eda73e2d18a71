//! The agent run loop: sample, publish, sleep, repeat. Ends on Ctrl-C or a
//! fatal broker error. The interrupt is only observed at the inter-cycle
//! sleep, so a cycle that has started always runs to completion.

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::buffer::RetryBuffer;
use crate::config::AgentConfig;
use crate::metrics;
use crate::publisher::{PublishError, Publisher};
use crate::report;
use crate::state::SamplerContext;

pub async fn run(
    mut ctx: SamplerContext,
    mut publisher: Publisher,
    cfg: &AgentConfig,
) -> Result<(), PublishError> {
    let mut buffer = RetryBuffer::new(cfg.buffer);
    let mut shutdown = Box::pin(tokio::signal::ctrl_c());

    let outcome = loop {
        let snapshot = metrics::sample(&mut ctx, cfg.cpu_window, cfg.net_window).await;
        let rendered = report::render(&snapshot);
        let payload = if cfg.json {
            // never fails for these types, but a dropped cycle beats dying
            serde_json::to_vec(&snapshot)
                .map_err(|e| warn!("snapshot serialization failed, cycle dropped: {e}"))
                .ok()
        } else {
            Some(rendered.clone().into_bytes())
        };

        if let Some(payload) = payload {
            match deliver(&mut publisher, &mut buffer, payload).await {
                Ok(()) => {
                    println!("[x] published report\n{rendered}");
                }
                Err(e) if e.is_fatal() => {
                    error!("fatal broker error: {e}");
                    break Err(e);
                }
                Err(e) => {
                    warn!(parked = buffer.len(), "report not delivered this cycle: {e}");
                }
            }
        }

        // The inter-cycle delay doubles as backoff after a transient failure.
        tokio::select! {
            biased;
            sig = &mut shutdown => {
                match sig {
                    Ok(()) => info!("interrupt received, shutting down"),
                    Err(e) => warn!("signal listener failed, shutting down: {e}"),
                }
                break Ok(());
            }
            _ = sleep(cfg.interval) => {}
        }
    };

    // Attempted even when delivery just failed; errors are logged inside.
    publisher.close().await;
    outcome
}

/// Send the backlog (oldest first), then the current payload. On a transient
/// failure the current payload is parked when a buffer is configured;
/// otherwise it is dropped by the caller's logging path.
async fn deliver(
    publisher: &mut Publisher,
    buffer: &mut RetryBuffer,
    payload: Vec<u8>,
) -> Result<(), PublishError> {
    let res = try_deliver(publisher, buffer, &payload).await;
    if let Err(e) = &res {
        if buffer.enabled() && !e.is_fatal() && buffer.push(payload) {
            warn!("resend buffer full, dropped the oldest parked report");
        }
    }
    res
}

async fn try_deliver(
    publisher: &mut Publisher,
    buffer: &mut RetryBuffer,
    payload: &[u8],
) -> Result<(), PublishError> {
    while let Some(parked) = buffer.pop() {
        if let Err(e) = publisher.publish(&parked).await {
            buffer.requeue_front(parked);
            return Err(e);
        }
        info!(remaining = buffer.len(), "delivered a parked report");
    }
    publisher.publish(payload).await
}
