//! Sampler-owned context: persistent sysinfo handles plus the resolved
//! platform. Owned by the run loop and threaded through collection, so
//! shutdown and sampling share no ambient globals.

use sysinfo::{CpuRefreshKind, MemoryRefreshKind, Networks, RefreshKind, System};

use crate::platform::Platform;

pub struct SamplerContext {
    pub sys: System,
    pub nets: Networks,
    pub platform: Platform,
    pub host: String,
}

impl SamplerContext {
    pub fn new(platform: Platform) -> Self {
        let refresh = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything());
        let mut sys = System::new_with_specifics(refresh);
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        // Keep Networks alive across cycles so per-refresh deltas are meaningful
        let nets = Networks::new_with_refreshed_list();

        let host = System::host_name().unwrap_or_else(|| "unknown".into());
        Self {
            sys,
            nets,
            platform,
            host,
        }
    }
}
