//! Platform capability descriptor. Which optional metric groups the target
//! supports is decided once at startup, not re-checked per field per cycle.

use once_cell::sync::OnceCell;

#[derive(Debug, Clone)]
pub struct Platform {
    pub name: String,
    /// iowait/irq/softirq/steal/guest CPU breakdown
    pub extended_cpu: bool,
    /// active/inactive/buffers/cached memory detail
    pub extended_memory: bool,
    /// cumulative pswpin/pswpout counters
    pub swap_paging: bool,
}

impl Platform {
    /// Resolve capabilities for the requested platform name, defaulting to the
    /// compile target. The extended groups need both the request and a procfs
    /// to read them from.
    pub fn resolve(requested: Option<&str>) -> Self {
        let name = requested.unwrap_or(std::env::consts::OS).to_ascii_lowercase();
        let procfs = cfg!(target_os = "linux") && name == "linux" && extended_enabled();
        Platform {
            name,
            extended_cpu: procfs,
            extended_memory: procfs,
            swap_paging: procfs,
        }
    }
}

// Read once; PROCFEED_AGENT_EXTENDED=0 forces the basic field set everywhere.
fn extended_enabled() -> bool {
    static ON: OnceCell<bool> = OnceCell::new();
    *ON.get_or_init(|| {
        std::env::var("PROCFEED_AGENT_EXTENDED")
            .map(|v| v != "0")
            .unwrap_or(true)
    })
}
