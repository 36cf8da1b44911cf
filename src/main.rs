mod delay;
mod duration;
mod logging;
mod server;
mod signal_handler;

use clap::Parser;
use logging::*;
use signal_handler::GracefulShutdown;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Time allowed for in-flight requests to finish after a shutdown signal
const SHUTDOWN_GRACE: Duration = Duration::from_secs(60);

#[derive(Parser)]
#[command(name = "tarpit")]
#[command(about = "HTTP test server that simulates slow upstream responses")]
struct Args {
    /// Address to listen on
    #[arg(default_value = "127.0.0.1:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt::init();

    let addr = resolve_listen_addr(&args.listen)?;
    let shutdown = CancellationToken::new();

    let mut server_task = tokio::spawn(server::run(addr, shutdown.clone()));
    let signals = GracefulShutdown::new(shutdown.clone());

    tokio::select! {
        result = &mut server_task => {
            // The listener failed or the server exited on its own; fatal.
            return match result {
                Ok(run_result) => run_result,
                Err(e) => Err(anyhow::anyhow!("server task panicked: {e}")),
            };
        }
        _ = signals.wait_for_shutdown() => {}
    }

    // The token is cancelled; give in-flight handlers a bounded window to
    // notice and finish before the process exits.
    match tokio::time::timeout(SHUTDOWN_GRACE, server_task).await {
        Ok(Ok(Ok(()))) => log_shutdown_complete(),
        Ok(Ok(Err(e))) => log_server_error(&format!("{e}")),
        Ok(Err(e)) => log_server_error(&format!("server task panicked: {e}")),
        Err(_) => log_shutdown_timeout(),
    }

    Ok(())
}

fn resolve_listen_addr(listen: &str) -> anyhow::Result<SocketAddr> {
    listen
        .to_socket_addrs()
        .map_err(|e| anyhow::anyhow!("invalid listen address {listen:?}: {e}"))?
        .next()
        .ok_or_else(|| anyhow::anyhow!("listen address {listen:?} resolved to nothing"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_socket_addrs_and_hostnames() {
        assert_eq!(
            resolve_listen_addr("127.0.0.1:8080").unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(resolve_listen_addr("localhost:9000").unwrap().port(), 9000);
        assert!(resolve_listen_addr("not an address").is_err());
    }
}
