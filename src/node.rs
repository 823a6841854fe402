use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::api::{router, AppState};
use crate::config::ServiceConfig;
use crate::coordinator::Coordinator;
use crate::error::{HasherError, Result};
use crate::shutdown::{DrainOutcome, ShutdownCoordinator};

/// A bound service instance: the coordinator, its HTTP front end and the
/// drain machinery. Constructed once per process and passed by value to
/// [`Node::run`]; there is no global state.
pub struct Node {
    pub config: ServiceConfig,
    pub coordinator: Coordinator,
    pub shutdown: ShutdownCoordinator,
    listener: TcpListener,
}

impl Node {
    /// Bind the listener. Port 0 picks an ephemeral port, see
    /// [`local_addr`](Self::local_addr).
    ///
    /// # Errors
    ///
    /// Returns [`HasherError::Io`] if the address cannot be bound.
    pub async fn bind(config: ServiceConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.listen_addr).await.map_err(|e| {
            tracing::error!(addr = %config.listen_addr, error = %e, "Failed to bind");
            HasherError::Io(e)
        })?;

        Ok(Self {
            coordinator: Coordinator::new(&config.worker),
            shutdown: ShutdownCoordinator::new(config.drain_timeout()),
            config,
            listener,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until a drain completes.
    ///
    /// 1. Spawns the HTTP server, which stops accepting once the shutdown
    ///    token is cancelled and then waits for in-flight requests.
    /// 2. Hands the server task to [`ShutdownCoordinator::supervise`].
    /// 3. Waits on the drain completion channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails; callers should exit non-zero.
    pub async fn run(self) -> Result<DrainOutcome> {
        let addr = self.local_addr()?;
        let app = router(AppState {
            coordinator: self.coordinator.clone(),
            shutdown: self.shutdown.clone(),
        });

        tracing::info!(
            addr = %addr,
            latency = ?self.config.worker.latency,
            drain_timeout = ?self.shutdown.timeout(),
            "Starting hasher-lite"
        );

        let token = self.shutdown.token();
        let listener = self.listener;
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(token.cancelled_owned())
                .await
        });

        let done = self.shutdown.supervise(server);
        done.await
            .map_err(|_| HasherError::Internal("drain supervisor exited without reporting".into()))?
    }
}
