//! Rendering properties: unit humanization, digit grouping, MiB truncation,
//! and the fixed block order of the textual report.

use procfeed_agent::report::{bytes2human, commify, commify_u64, mib, per_second, render};
use procfeed_agent::types::{
    CpuMetrics, CpuTimesPercent, MemoryExt, MemoryMetrics, MetricsSnapshot, NetworkDelta,
    SwapMetrics,
};

fn snapshot() -> MetricsSnapshot {
    let total = 16u64 * 1024 * 1024 * 1024;
    let used = 2u64 * 1024 * 1024 * 1024;
    MetricsSnapshot {
        host: "testhost".into(),
        taken_at: "2026-08-06T12:00:00+00:00".into(),
        memory: MemoryMetrics {
            total,
            available: total - used,
            used,
            free: total - used,
            percent: 12.5,
            ext: None,
        },
        swap: SwapMetrics {
            total: 2u64 * 1024 * 1024 * 1024,
            used: 0,
            free: 2u64 * 1024 * 1024 * 1024,
            percent: 0.0,
            sin_pages: None,
            sout_pages: None,
        },
        network: NetworkDelta {
            bytes_sent: 300,
            bytes_recv: 0,
            packets_sent: 4,
            packets_recv: 0,
            window_ms: 200,
        },
        cpu: CpuMetrics {
            total_percent: 7.5,
            times: Some(CpuTimesPercent {
                user: 5.0,
                nice: 0.0,
                system: 2.0,
                idle: 93.0,
                ext: None,
            }),
        },
    }
}

#[test]
fn bytes2human_picks_largest_unit_below_1024() {
    assert_eq!(bytes2human(1536), "1.50 K");
    assert_eq!(bytes2human(1023), "1023.00 B");
    assert_eq!(bytes2human(1_073_741_824), "1.00 G");
    assert_eq!(bytes2human(1024), "1.00 K");
    assert_eq!(bytes2human(0), "0.00 B");
    assert_eq!(bytes2human(1u64 << 60), "1.00 E");
}

#[test]
fn commify_groups_digits() {
    assert_eq!(commify("1234567"), "1,234,567");
    assert_eq!(commify("123"), "123");
    assert_eq!(commify("1234"), "1,234");
    assert_eq!(commify_u64(1_000_000), "1,000,000");
}

#[test]
fn commify_never_groups_after_the_decimal_point() {
    assert_eq!(commify("1234.5678"), "1,234.5678");
    assert_eq!(commify("0.123456"), "0.123456");
    assert_eq!(commify("-1234567.89"), "-1,234,567.89");
}

#[test]
fn mib_truncates_instead_of_rounding() {
    assert_eq!(mib(1024 * 1024 - 1), 0);
    assert_eq!(mib(2 * 1024 * 1024 - 1), 1);
    assert_eq!(mib(2 * 1024 * 1024), 2);
}

#[test]
fn per_second_scales_the_window_delta() {
    assert_eq!(per_second(300, 200), 1500);
    assert_eq!(per_second(0, 200), 0);
    // degenerate window passes the delta through
    assert_eq!(per_second(42, 0), 42);
}

#[test]
fn used_vs_total_matches_raw_fields_after_truncation() {
    let report = render(&snapshot());
    assert!(
        report.contains("2,048/16,384"),
        "used/total pair missing:\n{report}"
    );
    assert!(report.contains("Memory total:           16,384 MiB"));
    assert!(report.contains("Memory used:             2,048 MiB"));
}

#[test]
fn block_order_is_stable() {
    let report = render(&snapshot());
    let header = report.find("procfeed report from testhost").expect("header");
    let memory = report.find("\nMemory:").expect("memory block");
    let swap = report.find("\nSwap:").expect("swap block");
    let net = report.find("\nBytes sent/s:").expect("network block");
    let cpu = report.find("\nCPU busy:").expect("cpu block");
    assert!(header < memory && memory < swap && swap < net && net < cpu);
}

#[test]
fn zero_network_delta_renders_as_zero_bytes() {
    let report = render(&snapshot());
    assert!(report.contains("Bytes recv/s:           0.00 B"));
}

#[test]
fn extended_memory_lines_only_when_present() {
    let mut s = snapshot();
    let report = render(&s);
    assert!(!report.contains("Memory active:"));

    s.memory.ext = Some(MemoryExt {
        active: 1024 * 1024 * 1024,
        inactive: 512 * 1024 * 1024,
        buffers: 256 * 1024 * 1024,
        cached: 128 * 1024 * 1024,
    });
    let report = render(&s);
    assert!(report.contains("Memory active:           1,024 MiB"));
    assert!(report.contains("Memory cached:             128 MiB"));
}

#[test]
fn swap_paging_lines_only_when_present() {
    let mut s = snapshot();
    assert!(!render(&s).contains("Swap in:"));
    s.swap.sin_pages = Some(1_234_567);
    s.swap.sout_pages = Some(89);
    let report = render(&s);
    assert!(report.contains("Swap in:             1,234,567 pages"));
    assert!(report.contains("Swap out:                   89 pages"));
}
