//! Pure rendering of a snapshot into the textual report. Block order is
//! fixed (header, memory, swap, network, CPU) so snapshots diff cleanly.

use std::fmt::Write;

use crate::types::MetricsSnapshot;

/// Insert thousands separators into a numeric string. Only digits left of the
/// decimal point are grouped; sign and fraction pass through untouched.
pub fn commify(s: &str) -> String {
    let (int_part, rest) = match s.find('.') {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(d) => ("-", d),
        None => ("", int_part),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}{rest}")
}

pub fn commify_u64(n: u64) -> String {
    commify(&n.to_string())
}

/// Render a byte count with the largest binary unit that keeps the value
/// >= 1, two decimals. Below 1 KiB falls back to a plain "B" suffix.
pub fn bytes2human(n: u64) -> String {
    const SYMBOLS: [&str; 8] = ["K", "M", "G", "T", "P", "E", "Z", "Y"];
    for (i, sym) in SYMBOLS.iter().enumerate().rev() {
        let unit = 1024f64.powi(i as i32 + 1);
        if n as f64 >= unit {
            return format!("{:.2} {}", n as f64 / unit, sym);
        }
    }
    format!("{n}.00 B")
}

/// Whole mebibytes, truncated (not rounded).
pub fn mib(bytes: u64) -> u64 {
    bytes / 1024 / 1024
}

/// Scale a window delta to a per-second rate.
pub fn per_second(delta: u64, window_ms: u64) -> u64 {
    if window_ms == 0 {
        return delta;
    }
    (delta as f64 * 1000.0 / window_ms as f64) as u64
}

pub fn render(s: &MetricsSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "procfeed report from {} at {}", s.host, s.taken_at);

    let m = &s.memory;
    let mem_used_vs_total = format!("{}/{}", commify_u64(mib(m.used)), commify_u64(mib(m.total)));
    let _ = writeln!(out);
    let _ = writeln!(out, "Memory:           {mem_used_vs_total:>15}   (used/total, MiB)");
    let _ = writeln!(out, "Memory total:     {:>12} MiB", commify_u64(mib(m.total)));
    let _ = writeln!(out, "Memory available: {:>12} MiB", commify_u64(mib(m.available)));
    let _ = writeln!(out, "Memory percent:   {:>12.1} %", m.percent);
    let _ = writeln!(out, "Memory used:      {:>12} MiB", commify_u64(mib(m.used)));
    let _ = writeln!(out, "Memory free:      {:>12} MiB", commify_u64(mib(m.free)));
    if let Some(ext) = &m.ext {
        let _ = writeln!(out, "Memory active:    {:>12} MiB", commify_u64(mib(ext.active)));
        let _ = writeln!(out, "Memory inactive:  {:>12} MiB", commify_u64(mib(ext.inactive)));
        let _ = writeln!(out, "Memory buffers:   {:>12} MiB", commify_u64(mib(ext.buffers)));
        let _ = writeln!(out, "Memory cached:    {:>12} MiB", commify_u64(mib(ext.cached)));
    }

    let w = &s.swap;
    let swap_used_vs_total = format!("{}/{}", commify_u64(mib(w.used)), commify_u64(mib(w.total)));
    let _ = writeln!(out);
    let _ = writeln!(out, "Swap:             {swap_used_vs_total:>15}   (used/total, MiB)");
    let _ = writeln!(out, "Swap total:       {:>12} MiB", commify_u64(mib(w.total)));
    let _ = writeln!(out, "Swap used:        {:>12} MiB", commify_u64(mib(w.used)));
    let _ = writeln!(out, "Swap free:        {:>12} MiB", commify_u64(mib(w.free)));
    let _ = writeln!(out, "Swap percent:     {:>12.1} %", w.percent);
    if let Some(sin) = w.sin_pages {
        let _ = writeln!(out, "Swap in:          {:>12} pages", commify_u64(sin));
    }
    if let Some(sout) = w.sout_pages {
        let _ = writeln!(out, "Swap out:         {:>12} pages", commify_u64(sout));
    }

    let n = &s.network;
    let _ = writeln!(out);
    let _ = writeln!(out, "Bytes sent/s:     {:>12}", bytes2human(per_second(n.bytes_sent, n.window_ms)));
    let _ = writeln!(out, "Bytes recv/s:     {:>12}", bytes2human(per_second(n.bytes_recv, n.window_ms)));
    let _ = writeln!(out, "Packets sent/s:   {:>12}", bytes2human(per_second(n.packets_sent, n.window_ms)));
    let _ = writeln!(out, "Packets recv/s:   {:>12}", bytes2human(per_second(n.packets_recv, n.window_ms)));

    let c = &s.cpu;
    let _ = writeln!(out);
    let _ = writeln!(out, "CPU busy:    {:>6.1} %", c.total_percent);
    if let Some(t) = &c.times {
        let _ = writeln!(out, "CPU user:    {:>6.1} %   nice:  {:>6.1} %", t.user, t.nice);
        let _ = writeln!(out, "CPU system:  {:>6.1} %   idle:  {:>6.1} %", t.system, t.idle);
        if let Some(x) = &t.ext {
            let _ = writeln!(out, "CPU iowait:  {:>6.1} %   irq:   {:>6.1} %", x.iowait, x.irq);
            let _ = writeln!(out, "CPU softirq: {:>6.1} %   steal: {:>6.1} %", x.softirq, x.steal);
            let _ = writeln!(out, "CPU guest:   {:>6.1} %", x.guest);
        }
    }

    out
}
