//! procfeed console: drains the metrics queue and prints each report.
//! Intentionally a minimal auto-ack sink with no backpressure.

use anyhow::Context;
use futures_util::StreamExt;
use lapin::options::{BasicConsumeOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Connection, ConnectionProperties};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_AMQP: &str = "amqp://localhost:5672/%2f";
const DEFAULT_QUEUE: &str = "proc_info";

struct ParsedArgs {
    amqp: String,
    queue: String,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "procfeed".into());
    let usage = format!("Usage: {prog} [--amqp URL|-a URL] [--queue NAME|-q NAME]");

    let mut amqp: Option<String> = None;
    let mut queue: Option<String> = None;

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage),
            "--amqp" | "-a" => amqp = it.next(),
            "--queue" | "-q" => queue = it.next(),
            _ if arg.starts_with("--amqp=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        amqp = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--queue=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        queue = Some(v.to_string());
                    }
                }
            }
            _ => return Err(format!("Unexpected argument '{arg}'. {usage}")),
        }
    }

    Ok(ParsedArgs {
        amqp: amqp
            .or_else(|| std::env::var("PROCFEED_AMQP").ok())
            .unwrap_or_else(|| DEFAULT_AMQP.into()),
        queue: queue
            .or_else(|| std::env::var("PROCFEED_QUEUE").ok())
            .unwrap_or_else(|| DEFAULT_QUEUE.into()),
    })
}

// Invoked once per received message with the raw body.
fn display(body: &[u8]) {
    println!("[x] received\n{}", String::from_utf8_lossy(body));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = match parse_args(std::env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let conn = Connection::connect(&args.amqp, ConnectionProperties::default())
        .await
        .with_context(|| format!("connecting to broker at {}", args.amqp))?;
    let channel = conn.create_channel().await?;
    // Same idempotent declare as the agent; whichever side starts first
    // creates the queue.
    channel
        .queue_declare(&args.queue, QueueDeclareOptions::default(), FieldTable::default())
        .await
        .context("declaring queue")?;
    let mut consumer = channel
        .basic_consume(
            &args.queue,
            "procfeed",
            BasicConsumeOptions {
                no_ack: true,
                ..BasicConsumeOptions::default()
            },
            FieldTable::default(),
        )
        .await
        .context("registering consumer")?;

    println!(
        " [*] Waiting for messages on '{}'. To exit press CTRL+C",
        args.queue
    );

    let mut shutdown = Box::pin(tokio::signal::ctrl_c());
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("interrupt received, exiting");
                break;
            }
            delivery = consumer.next() => match delivery {
                Some(Ok(d)) => display(&d.data),
                Some(Err(e)) => return Err(e).context("broker connection failed"),
                None => {
                    warn!("delivery stream closed by broker");
                    anyhow::bail!("delivery stream closed by broker");
                }
            }
        }
    }
    Ok(())
}
