use crate::logging::*;
use tokio_util::sync::CancellationToken;

/// Graceful shutdown handler for the delay server.
///
/// Owns the process-wide cancellation token; cancelling it is the one
/// broadcast every in-flight handler observes.
pub struct GracefulShutdown {
    shutdown: CancellationToken,
}

impl GracefulShutdown {
    pub fn new(shutdown: CancellationToken) -> Self {
        Self { shutdown }
    }

    /// Wait for a shutdown signal, then broadcast cancellation.
    pub async fn wait_for_shutdown(&self) {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log_shutdown_signal("SIGINT (Ctrl+C)");
            }
            _ = Self::wait_for_sigterm() => {
                log_shutdown_signal("SIGTERM");
            }
        }
        self.shutdown.cancel();
    }

    /// Wait for SIGTERM signal (Unix only)
    #[cfg(unix)]
    async fn wait_for_sigterm() {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            // Registration failed; never resolve rather than faking a signal
            Err(_) => std::future::pending::<()>().await,
        }
    }

    /// For non-Unix systems, this will never trigger
    #[cfg(not(unix))]
    async fn wait_for_sigterm() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelling_the_token_reaches_all_clones() {
        let shutdown = CancellationToken::new();
        let observer = shutdown.clone();
        let handler = GracefulShutdown::new(shutdown);

        assert!(!observer.is_cancelled());
        handler.shutdown.cancel();
        assert!(observer.is_cancelled());
        // Already-cancelled tokens resolve immediately.
        observer.cancelled().await;
    }
}
