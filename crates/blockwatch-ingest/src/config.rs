//! Scheduler configuration.

use std::time::Duration;

/// Timing and bounds for the two periodic loops.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// Head tick period.
    pub head_interval: Duration,

    /// Gap scan period.
    pub gap_interval: Duration,

    /// Maximum missing heights fetched per chain per gap scan. Also the
    /// in-flight bound on concurrent gap fetches.
    pub gap_limit: usize,

    /// Explicit deadline for individual RPC calls. When unset, each loop
    /// uses its own period as the deadline.
    pub rpc_deadline: Option<Duration>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            head_interval: Duration::from_secs(5),
            gap_interval: Duration::from_secs(60),
            gap_limit: 10,
            rpc_deadline: None,
        }
    }
}

impl IngestConfig {
    /// Deadline applied to RPC calls made by the head tick.
    pub fn head_deadline(&self) -> Duration {
        self.rpc_deadline.unwrap_or(self.head_interval)
    }

    /// Deadline applied to RPC calls made by the gap scan.
    pub fn gap_deadline(&self) -> Duration {
        self.rpc_deadline.unwrap_or(self.gap_interval)
    }

    /// Short periods for tests.
    pub fn for_testing() -> Self {
        Self {
            head_interval: Duration::from_millis(10),
            gap_interval: Duration::from_millis(25),
            gap_limit: 10,
            rpc_deadline: Some(Duration::from_secs(1)),
        }
    }
}
