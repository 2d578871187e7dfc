//! Process-local health signals.
//!
//! Liveness looks only at this process: resident memory against a
//! configurable ceiling. Store reachability is the readiness probe's
//! concern, never liveness.

/// Resident set size of this process in bytes, if the platform exposes it.
pub fn current_rss_bytes() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        let status = std::fs::read_to_string("/proc/self/status").ok()?;
        parse_vm_rss_bytes(&status)
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

/// Whether resident memory is under the ceiling. No ceiling, or no RSS
/// reading on this platform, passes.
pub fn memory_ok(ceiling_bytes: Option<u64>) -> bool {
    match (ceiling_bytes, current_rss_bytes()) {
        (Some(ceiling), Some(rss)) => rss <= ceiling,
        _ => true,
    }
}

#[cfg(target_os = "linux")]
fn parse_vm_rss_bytes(status: &str) -> Option<u64> {
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}
