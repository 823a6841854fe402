use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{HasherError, Result};

/// How a drain finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The front end stopped and every in-flight request completed.
    Graceful,
    /// The deadline passed first. The server task was aborted and any
    /// connection still open is left to die with the process.
    TimedOut,
}

/// Receives the single drain completion report.
pub type DrainReceiver = oneshot::Receiver<Result<DrainOutcome>>;

/// Bounded-time graceful stop of the HTTP front end.
///
/// [`drain`](Self::drain) only cancels the token. The front end is wired with
/// `with_graceful_shutdown(token)`, and the task started by
/// [`supervise`](Self::supervise) enforces the deadline and reports the
/// outcome on a oneshot channel. Background digest tasks are not cancelled.
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
    timeout: Duration,
}

impl ShutdownCoordinator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Token the front end stops on.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_draining(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Request a drain. Returns immediately; repeated calls are no-ops.
    pub fn drain(&self) {
        if self.token.is_cancelled() {
            tracing::debug!("Drain already in progress");
            return;
        }
        tracing::info!(timeout = ?self.timeout, "Drain requested");
        self.token.cancel();
    }

    /// Watch the front-end task and report how it stopped.
    ///
    /// The report is `Ok` for a graceful or deadline-forced stop and `Err`
    /// when the server itself failed, which the caller must treat as fatal.
    pub fn supervise(&self, mut server: JoinHandle<std::io::Result<()>>) -> DrainReceiver {
        let (done_tx, done_rx) = oneshot::channel();
        let token = self.token.clone();
        let timeout = self.timeout;

        tokio::spawn(async move {
            let report = tokio::select! {
                result = &mut server => flatten(result),
                _ = token.cancelled() => {
                    match tokio::time::timeout(timeout, &mut server).await {
                        Ok(result) => flatten(result),
                        Err(_) => {
                            tracing::warn!(
                                timeout = ?timeout,
                                "Drain deadline reached, abandoning open connections"
                            );
                            server.abort();
                            Ok(DrainOutcome::TimedOut)
                        }
                    }
                }
            };

            match &report {
                Ok(outcome) => tracing::info!(outcome = ?outcome, "Drain complete"),
                Err(e) => tracing::error!(error = %e, "Front end failed during drain"),
            }

            if done_tx.send(report).is_err() {
                tracing::debug!("Drain receiver dropped");
            }
        });

        done_rx
    }

    /// Drain on SIGTERM or SIGINT.
    pub fn install_signal_handler(&self) {
        let shutdown = self.clone();

        tokio::spawn(async move {
            let (mut sigterm, mut sigint) = match (
                signal(SignalKind::terminate()),
                signal(SignalKind::interrupt()),
            ) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::error!(error = %e, "Failed to install signal handlers");
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                }
                _ = shutdown.token.cancelled() => return,
            }

            shutdown.drain();
        });
    }
}

fn flatten(
    result: std::result::Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<DrainOutcome> {
    match result {
        Ok(Ok(())) => Ok(DrainOutcome::Graceful),
        Ok(Err(e)) => Err(HasherError::Io(e)),
        Err(e) => Err(HasherError::Internal(format!("front end task failed: {e}"))),
    }
}
