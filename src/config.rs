use std::net::SocketAddr;
use std::time::Duration;

/// Default artificial delay before a digest is published.
pub const DEFAULT_WORK_LATENCY: Duration = Duration::from_secs(5);

/// Configuration for the background digest workers.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Fixed delay every job sleeps before hashing. Not data-dependent.
    pub latency: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            latency: DEFAULT_WORK_LATENCY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen_addr: SocketAddr,
    pub worker: WorkerConfig,
    /// Upper bound on how long a drain waits for the front end to stop.
    /// When unset, twice the worker latency is used so at least one
    /// in-flight job can publish.
    pub drain_timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 9090)),
            worker: WorkerConfig::default(),
            drain_timeout: None,
        }
    }
}

impl ServiceConfig {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.worker.latency = latency;
        self
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = Some(timeout);
        self
    }

    /// Effective drain deadline.
    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
            .unwrap_or_else(|| self.worker.latency.saturating_mul(2))
    }
}
