//! Snapshot value types published to the queue.
//! Keep this module minimal and stable; in json mode it defines the wire format.

use serde::Serialize;

#[derive(Debug, Serialize, Clone)]
pub struct MemoryMetrics {
    pub total: u64,
    pub available: u64,
    // used is total - available, not the OS "used" figure
    pub used: u64,
    pub free: u64,
    pub percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<MemoryExt>,
}

/// Linux-only memory detail, present when the platform supports it.
#[derive(Debug, Serialize, Clone)]
pub struct MemoryExt {
    pub active: u64,
    pub inactive: u64,
    pub buffers: u64,
    pub cached: u64,
}

#[derive(Debug, Serialize, Clone)]
pub struct SwapMetrics {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
    // cumulative pages swapped in/out since boot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sin_pages: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sout_pages: Option<u64>,
}

/// Counters accumulated over the sampling window, summed across interfaces.
#[derive(Debug, Serialize, Clone)]
pub struct NetworkDelta {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
    pub window_ms: u64,
}

#[derive(Debug, Serialize, Clone)]
pub struct CpuMetrics {
    pub total_percent: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub times: Option<CpuTimesPercent>,
}

/// Share of the averaging window spent in each CPU state.
#[derive(Debug, Serialize, Clone)]
pub struct CpuTimesPercent {
    pub user: f64,
    pub nice: f64,
    pub system: f64,
    pub idle: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<CpuTimesExt>,
}

#[derive(Debug, Serialize, Clone)]
pub struct CpuTimesExt {
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
    pub steal: f64,
    pub guest: f64,
}

/// One coherent capture per cycle; built fresh, never mutated.
#[derive(Debug, Serialize, Clone)]
pub struct MetricsSnapshot {
    pub host: String,
    pub taken_at: String,
    pub memory: MemoryMetrics,
    pub swap: SwapMetrics,
    pub network: NetworkDelta,
    pub cpu: CpuMetrics,
}
