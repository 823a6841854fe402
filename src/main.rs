use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use hasher_lite::config::ServiceConfig;
use hasher_lite::node::Node;
use hasher_lite::shutdown::DrainOutcome;

#[derive(Parser, Debug)]
#[command(name = "hasher-lite")]
#[command(version)]
#[command(about = "Password digest service with delayed hashing and graceful drain")]
struct Args {
    /// Address to bind the HTTP listener to
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Port to listen on
    #[arg(long, default_value = "9090")]
    port: u16,

    /// Artificial delay before each digest is published, in milliseconds
    #[arg(long, default_value = "5000")]
    latency_ms: u64,

    /// Drain deadline in milliseconds (default: twice the latency)
    #[arg(long)]
    drain_timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = ServiceConfig::new(SocketAddr::new(args.bind, args.port))
        .with_latency(Duration::from_millis(args.latency_ms));
    if let Some(ms) = args.drain_timeout_ms {
        config = config.with_drain_timeout(Duration::from_millis(ms));
    }

    let node = Node::bind(config).await?;
    node.shutdown.install_signal_handler();

    match node.run().await {
        Ok(DrainOutcome::Graceful) => tracing::info!("Shut down cleanly"),
        Ok(DrainOutcome::TimedOut) => {
            tracing::warn!("Shut down after drain deadline, in-flight requests were dropped")
        }
        Err(e) => {
            tracing::error!(error = %e, "Drain failed");
            return Err(e.into());
        }
    }

    Ok(())
}
