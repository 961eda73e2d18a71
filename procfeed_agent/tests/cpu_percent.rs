//! Two-point CPU times conversion: jiffies deltas to per-state percentages.

use procfeed_agent::metrics::{times_percent, CpuTicks};

#[test]
fn splits_the_window_across_states() {
    let t0 = CpuTicks::default();
    let t1 = CpuTicks {
        user: 50,
        system: 25,
        idle: 25,
        ..CpuTicks::default()
    };
    let p = times_percent(t0, t1, false).expect("non-empty window");
    assert_eq!(p.user, 50.0);
    assert_eq!(p.nice, 0.0);
    assert_eq!(p.system, 25.0);
    assert_eq!(p.idle, 25.0);
    assert!(p.ext.is_none());
}

#[test]
fn extended_states_only_on_request() {
    let t0 = CpuTicks::default();
    let t1 = CpuTicks {
        user: 40,
        idle: 40,
        iowait: 10,
        steal: 10,
        ..CpuTicks::default()
    };
    let p = times_percent(t0, t1, true).expect("non-empty window");
    let ext = p.ext.expect("extended group requested");
    assert_eq!(ext.iowait, 10.0);
    assert_eq!(ext.steal, 10.0);
    assert_eq!(ext.irq, 0.0);
}

#[test]
fn counts_relative_to_the_earlier_sample() {
    let t0 = CpuTicks {
        user: 1000,
        idle: 1000,
        ..CpuTicks::default()
    };
    let t1 = CpuTicks {
        user: 1030,
        idle: 1070,
        ..CpuTicks::default()
    };
    let p = times_percent(t0, t1, false).expect("non-empty window");
    assert_eq!(p.user, 30.0);
    assert_eq!(p.idle, 70.0);
}

#[test]
fn empty_window_yields_none() {
    let t = CpuTicks {
        user: 10,
        idle: 90,
        ..CpuTicks::default()
    };
    assert!(times_percent(t, t, true).is_none());
}

#[test]
fn guest_time_does_not_inflate_the_total() {
    // the kernel folds guest into user; only the first eight states count
    let t0 = CpuTicks::default();
    let t1 = CpuTicks {
        user: 50,
        idle: 50,
        guest: 30,
        ..CpuTicks::default()
    };
    let p = times_percent(t0, t1, true).expect("non-empty window");
    assert_eq!(p.user, 50.0);
    assert_eq!(p.ext.expect("ext").guest, 30.0);
}
