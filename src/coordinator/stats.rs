use std::time::Duration;

use serde::Serialize;

/// Running totals for accepted submissions.
///
/// `total_elapsed` receives both request-path time and background digest
/// time, while `total_accepted` only counts submissions. The derived average
/// therefore includes worker latency.
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    total_accepted: u64,
    total_elapsed: Duration,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one accepted submission and the time it took.
    pub fn record_submission(&mut self, elapsed: Duration) {
        self.total_accepted = self.total_accepted.saturating_add(1);
        self.record_elapsed(elapsed);
    }

    /// Add time without counting a submission (background work).
    pub fn record_elapsed(&mut self, elapsed: Duration) {
        self.total_elapsed = self.total_elapsed.saturating_add(elapsed);
    }

    pub fn snapshot(&self) -> Stats {
        Stats {
            total: self.total_accepted,
            total_elapsed: self.total_elapsed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: u64,
    pub total_elapsed: Duration,
}

impl Stats {
    /// Mean elapsed time per accepted submission; zero when nothing has been
    /// submitted yet.
    pub fn average(&self) -> Duration {
        if self.total == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total_elapsed.as_nanos() / u128::from(self.total);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    pub fn average_millis(&self) -> u64 {
        u64::try_from(self.average().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn report(&self) -> StatsReport {
        StatsReport {
            total: self.total,
            average: self.average_millis(),
        }
    }
}

/// Wire form of [`Stats`]: `{"Total": n, "Average": ms}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatsReport {
    pub total: u64,
    pub average: u64,
}
