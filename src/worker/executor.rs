use std::time::Duration;

use crate::config::WorkerConfig;
use crate::coordinator::JobId;
use crate::worker::digest::sha512_base64;

/// Produces digests after the configured artificial latency.
#[derive(Debug, Clone)]
pub struct DigestExecutor {
    latency: Duration,
}

impl DigestExecutor {
    pub fn new(config: &WorkerConfig) -> Self {
        Self {
            latency: config.latency,
        }
    }

    /// Sleep for the configured latency, then hash `input`.
    pub async fn execute(&self, job_id: JobId, input: &str) -> String {
        tracing::debug!(job_id = %job_id, latency = ?self.latency, "Hashing job");
        tokio::time::sleep(self.latency).await;
        sha512_base64(input.as_bytes())
    }
}
