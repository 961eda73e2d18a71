//! Snapshot collection: sysinfo for memory/swap/network, procfs deltas for
//! the per-state CPU breakdown and the Linux-only extended groups.

use std::time::Duration;

use chrono::{Local, SecondsFormat};
use sysinfo::System;
use tokio::time::sleep;

use crate::state::SamplerContext;
use crate::types::{
    CpuMetrics, CpuTimesExt, CpuTimesPercent, MemoryExt, MemoryMetrics, MetricsSnapshot,
    NetworkDelta, SwapMetrics,
};

/// Collect one coherent snapshot. Awaits twice: the CPU averaging window and
/// the network delta window. No I/O beyond metrics queries.
pub async fn sample(
    ctx: &mut SamplerContext,
    cpu_window: Duration,
    net_window: Duration,
) -> MetricsSnapshot {
    let cpu = sample_cpu(&mut ctx.sys, cpu_window, ctx.platform.extended_cpu).await;

    // Memory and swap are instantaneous reads.
    ctx.sys.refresh_memory();
    let total = ctx.sys.total_memory();
    let available = ctx.sys.available_memory();
    let used = total.saturating_sub(available);
    let memory = MemoryMetrics {
        total,
        available,
        used,
        free: ctx.sys.free_memory(),
        percent: percent_of(used, total),
        ext: if ctx.platform.extended_memory {
            read_memory_ext()
        } else {
            None
        },
    };

    let (sin_pages, sout_pages) = if ctx.platform.swap_paging {
        match read_swap_paging() {
            Some((sin, sout)) => (Some(sin), Some(sout)),
            None => (None, None),
        }
    } else {
        (None, None)
    };
    let swap_total = ctx.sys.total_swap();
    let swap_used = ctx.sys.used_swap();
    let swap = SwapMetrics {
        total: swap_total,
        used: swap_used,
        free: ctx.sys.free_swap(),
        percent: percent_of(swap_used, swap_total),
        sin_pages,
        sout_pages,
    };

    // Network delta: reset the per-interface baseline, wait the window, read
    // the accumulated counters. Deltas are unsigned, so a counter reset shows
    // up as zero rather than a negative rate.
    ctx.nets.refresh(true);
    sleep(net_window).await;
    ctx.nets.refresh(true);
    let mut network = NetworkDelta {
        bytes_sent: 0,
        bytes_recv: 0,
        packets_sent: 0,
        packets_recv: 0,
        window_ms: net_window.as_millis() as u64,
    };
    for (_name, data) in ctx.nets.iter() {
        network.bytes_sent = network.bytes_sent.saturating_add(data.transmitted());
        network.bytes_recv = network.bytes_recv.saturating_add(data.received());
        network.packets_sent = network.packets_sent.saturating_add(data.packets_transmitted());
        network.packets_recv = network.packets_recv.saturating_add(data.packets_received());
    }

    MetricsSnapshot {
        host: ctx.host.clone(),
        taken_at: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        memory,
        swap,
        network,
        cpu,
    }
}

async fn sample_cpu(sys: &mut System, window: Duration, extended: bool) -> CpuMetrics {
    sys.refresh_cpu_usage();
    let before = cpu_ticks();
    sleep(window).await;
    sys.refresh_cpu_usage();
    let times = match (before, cpu_ticks()) {
        (Some(t0), Some(t1)) => times_percent(t0, t1, extended),
        _ => None,
    };
    CpuMetrics {
        total_percent: sys.global_cpu_usage(),
        times,
    }
}

fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 / whole as f64 * 100.0)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Jiffies from the aggregate "cpu" line of /proc/stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
}

impl CpuTicks {
    // total excludes guest, which the kernel already folds into user
    fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }
}

/// Percent of the elapsed window spent in each state. Returns `None` when the
/// window was too short for any jiffies to accrue.
pub fn times_percent(t0: CpuTicks, t1: CpuTicks, extended: bool) -> Option<CpuTimesPercent> {
    let total = t1.total().saturating_sub(t0.total());
    if total == 0 {
        return None;
    }
    let pct = |a: u64, b: u64| round1(b.saturating_sub(a) as f64 / total as f64 * 100.0);
    let ext = extended.then(|| CpuTimesExt {
        iowait: pct(t0.iowait, t1.iowait),
        irq: pct(t0.irq, t1.irq),
        softirq: pct(t0.softirq, t1.softirq),
        steal: pct(t0.steal, t1.steal),
        guest: pct(t0.guest, t1.guest),
    });
    Some(CpuTimesPercent {
        user: pct(t0.user, t1.user),
        nice: pct(t0.nice, t1.nice),
        system: pct(t0.system, t1.system),
        idle: pct(t0.idle, t1.idle),
        ext,
    })
}

// /proc/stat first line: "cpu  user nice system idle iowait irq softirq steal guest ..."
#[cfg(target_os = "linux")]
fn cpu_ticks() -> Option<CpuTicks> {
    let s = std::fs::read_to_string("/proc/stat").ok()?;
    let line = s.lines().next()?;
    let mut it = line.split_whitespace();
    let _cpu = it.next()?;
    let mut f = [0u64; 9];
    for slot in f.iter_mut() {
        *slot = it.next().and_then(|tok| tok.parse().ok()).unwrap_or(0);
    }
    Some(CpuTicks {
        user: f[0],
        nice: f[1],
        system: f[2],
        idle: f[3],
        iowait: f[4],
        irq: f[5],
        softirq: f[6],
        steal: f[7],
        guest: f[8],
    })
}

#[cfg(not(target_os = "linux"))]
fn cpu_ticks() -> Option<CpuTicks> {
    None
}

// /proc/meminfo lines: "Active:  123456 kB"
#[cfg(target_os = "linux")]
fn read_memory_ext() -> Option<MemoryExt> {
    let s = std::fs::read_to_string("/proc/meminfo").ok()?;
    let mut active = None;
    let mut inactive = None;
    let mut buffers = None;
    let mut cached = None;
    for line in s.lines() {
        let mut it = line.split_whitespace();
        let (Some(key), Some(val)) = (it.next(), it.next()) else {
            continue;
        };
        let Ok(kb) = val.parse::<u64>() else {
            continue;
        };
        match key {
            "Active:" => active = Some(kb * 1024),
            "Inactive:" => inactive = Some(kb * 1024),
            "Buffers:" => buffers = Some(kb * 1024),
            "Cached:" => cached = Some(kb * 1024),
            _ => {}
        }
    }
    Some(MemoryExt {
        active: active?,
        inactive: inactive?,
        buffers: buffers?,
        cached: cached?,
    })
}

#[cfg(not(target_os = "linux"))]
fn read_memory_ext() -> Option<MemoryExt> {
    None
}

// /proc/vmstat lines: "pswpin 12345" (cumulative pages since boot)
#[cfg(target_os = "linux")]
fn read_swap_paging() -> Option<(u64, u64)> {
    let s = std::fs::read_to_string("/proc/vmstat").ok()?;
    let mut sin = None;
    let mut sout = None;
    for line in s.lines() {
        let mut it = line.split_whitespace();
        let (Some(key), Some(val)) = (it.next(), it.next()) else {
            continue;
        };
        match key {
            "pswpin" => sin = val.parse().ok(),
            "pswpout" => sout = val.parse().ok(),
            _ => {}
        }
    }
    Some((sin?, sout?))
}

#[cfg(not(target_os = "linux"))]
fn read_swap_paging() -> Option<(u64, u64)> {
    None
}
