use crate::delay;
use crate::logging::*;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use std::future::Future;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::error;

/// Bind the listener and assemble the serve future.
///
/// Returns the bound address alongside the future so callers can bind port 0
/// and learn where the server actually landed. The future resolves once the
/// shutdown token is cancelled and in-flight connections have drained.
pub fn build(
    addr: &SocketAddr,
    shutdown: CancellationToken,
) -> anyhow::Result<(SocketAddr, impl Future<Output = hyper::Result<()>>)> {
    let handler_shutdown = shutdown.clone();
    let make_svc = make_service_fn(move |_conn| {
        let shutdown = handler_shutdown.clone();
        async move {
            Ok::<_, hyper::Error>(service_fn(move |req| {
                let shutdown = shutdown.clone();
                async move {
                    match route(req, shutdown).await {
                        Ok(response) => Ok::<Response<Body>, hyper::Error>(response),
                        Err(e) => {
                            error!("Request error: {}", e);
                            // Use expect here since this is a last resort error handler
                            // and the Response::builder should never fail with valid inputs
                            Ok(Response::builder()
                                .status(StatusCode::INTERNAL_SERVER_ERROR)
                                .body(Body::from("Internal server error"))
                                .expect("Failed to build error response"))
                        }
                    }
                }
            }))
        }
    });

    let server = Server::try_bind(addr)?.serve(make_svc);
    let local_addr = server.local_addr();
    let graceful = server.with_graceful_shutdown(async move { shutdown.cancelled().await });
    Ok((local_addr, graceful))
}

/// Bind, log the banner and serve until shutdown. A bind failure is fatal.
pub async fn run(addr: SocketAddr, shutdown: CancellationToken) -> anyhow::Result<()> {
    let (local_addr, server) = match build(&addr, shutdown) {
        Ok(bound) => bound,
        Err(e) => {
            log_server_error(&format!("{e}"));
            return Err(e);
        }
    };

    log_server_start(&local_addr);

    if let Err(e) = server.await {
        log_server_error(&format!("{e}"));
        return Err(anyhow::anyhow!("Server error: {}", e));
    }

    Ok(())
}

/// Route by exact path, any method. `{delay}` is a single path segment;
/// anything deeper is not a route we know.
async fn route(
    req: Request<Body>,
    shutdown: CancellationToken,
) -> anyhow::Result<Response<Body>> {
    let path = req.uri().path().to_string();
    match path.as_str() {
        "/fail" => delay::fail(),
        "/slow" => delay::slow(&req, "", shutdown).await,
        _ => {
            if let Some(raw_delay) = path.strip_prefix("/slow/") {
                if !raw_delay.contains('/') {
                    return delay::slow(&req, raw_delay, shutdown).await;
                }
            }
            Ok(Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Body::empty())?)
        }
    }
}
