//! Agent configuration: hand-rolled flag parsing with env fallbacks.

use std::time::Duration;

pub const DEFAULT_AMQP: &str = "amqp://localhost:5672/%2f";
pub const DEFAULT_QUEUE: &str = "proc_info";
pub const DEFAULT_INTERVAL_SECS: f64 = 3.0;
pub const DEFAULT_CPU_WINDOW_MS: u64 = 500;
pub const DEFAULT_NET_WINDOW_MS: u64 = 200;

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub amqp: String,
    pub queue: String,
    pub interval: Duration,
    pub cpu_window: Duration,
    pub net_window: Duration,
    pub platform: Option<String>,
    /// publish the JSON snapshot instead of the text report
    pub json: bool,
    /// resend buffer capacity; 0 disables it
    pub buffer: usize,
}

pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<AgentConfig, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "procfeed_agent".into());
    let usage = format!(
        "Usage: {prog} [--amqp URL|-a URL] [--queue NAME|-q NAME] [--interval SECS|-i SECS] [--platform NAME|-P NAME] [--json] [--buffer N]"
    );

    let mut amqp: Option<String> = None;
    let mut queue: Option<String> = None;
    let mut interval: Option<String> = None;
    let mut platform: Option<String> = None;
    let mut json = false;
    let mut buffer: Option<String> = None;

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage),
            "--amqp" | "-a" => amqp = it.next(),
            "--queue" | "-q" => queue = it.next(),
            "--interval" | "-i" => interval = it.next(),
            "--platform" | "-P" => platform = it.next(),
            "--json" => json = true,
            "--buffer" => buffer = it.next(),
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
            _ if arg.starts_with("--interval=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        interval = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--platform=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        platform = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--buffer=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        buffer = Some(v.to_string());
                    }
                }
            }
            _ => return Err(format!("Unexpected argument '{arg}'. {usage}")),
        }
    }

    let amqp = amqp
        .or_else(|| std::env::var("PROCFEED_AMQP").ok())
        .unwrap_or_else(|| DEFAULT_AMQP.into());
    let queue = queue
        .or_else(|| std::env::var("PROCFEED_QUEUE").ok())
        .unwrap_or_else(|| DEFAULT_QUEUE.into());

    let interval_secs = match interval.or_else(|| std::env::var("PROCFEED_INTERVAL").ok()) {
        Some(s) => s
            .parse::<f64>()
            .map_err(|_| format!("Invalid interval '{s}'. {usage}"))?,
        None => DEFAULT_INTERVAL_SECS,
    };
    if !(interval_secs > 0.0) {
        return Err(format!("Interval must be positive. {usage}"));
    }

    let buffer = match buffer {
        Some(s) => s
            .parse::<usize>()
            .map_err(|_| format!("Invalid buffer size '{s}'. {usage}"))?,
        None => 0,
    };

    Ok(AgentConfig {
        amqp,
        queue,
        interval: Duration::from_secs_f64(interval_secs),
        cpu_window: Duration::from_millis(env_ms("PROCFEED_CPU_WINDOW_MS", DEFAULT_CPU_WINDOW_MS)),
        net_window: Duration::from_millis(env_ms("PROCFEED_NET_WINDOW_MS", DEFAULT_NET_WINDOW_MS)),
        platform,
        json,
        buffer,
    })
}

fn env_ms(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
