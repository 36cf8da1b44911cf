use crate::duration;
use crate::logging::*;
use chrono::{SecondsFormat, Utc};
use hyper::body::{Bytes, Sender};
use hyper::{Body, Request, Response, StatusCode};
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Delay used when the request names none
pub const DEFAULT_DELAY: &str = "10s";

/// Interval between progress lines written to the response body
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle `/slow/{delay}`: hold the response open for the requested delay,
/// writing one `tick: <timestamp>` line per second so the client observes
/// partial data without waiting for completion.
///
/// The wait races four conditions and the first to occur wins: the delay
/// timer, the per-second ticker, client disconnect (seen as a failed tick
/// write) and process-wide shutdown.
pub async fn slow(
    req: &Request<Body>,
    raw_delay: &str,
    shutdown: CancellationToken,
) -> anyhow::Result<Response<Body>> {
    log_request_start(req.method().as_str(), &req.uri().to_string());

    let raw_delay = if raw_delay.is_empty() {
        log_default_delay(DEFAULT_DELAY);
        DEFAULT_DELAY
    } else {
        raw_delay
    };

    let pause = match duration::parse(raw_delay) {
        Ok(pause) => pause,
        Err(e) => {
            log_delay_parse_error(raw_delay, &e.to_string());
            return Ok(Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .body(Body::empty())?);
        }
    };

    log_pausing(&pause);

    // Returning the channel-backed body sends the 200 and headers right away;
    // everything after that is streamed from the tick task.
    let (tx, body) = Body::channel();
    let uri = req.uri().to_string();
    tokio::spawn(async move {
        stream_ticks(pause, TICK_PERIOD, tx, shutdown).await;
        log_request_finished(&uri);
    });

    Ok(Response::new(body))
}

/// Handle `/fail`: an immediate 504, the fast negative-path fixture.
pub fn fail() -> anyhow::Result<Response<Body>> {
    Ok(Response::builder()
        .status(StatusCode::GATEWAY_TIMEOUT)
        .body(Body::empty())?)
}

/// Tick loop behind a `/slow` response body.
///
/// Exits on the first of: delay elapsed, shutdown cancelled, or a tick write
/// failing because the client went away. The select is biased with the ticker
/// ahead of the timer so a delay of N whole seconds yields exactly N ticks.
async fn stream_ticks(
    pause: Duration,
    tick_period: Duration,
    mut tx: Sender,
    shutdown: CancellationToken,
) {
    let timer = tokio::time::sleep(pause);
    tokio::pin!(timer);

    // First tick one period in, not immediately; a stalled loop skips missed
    // ticks rather than bursting, matching a wall-clock ticker.
    let mut ticker = interval_at(Instant::now() + tick_period, tick_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                tracing::debug!("shutdown requested, ending delay early");
                return;
            }
            _ = ticker.tick() => {
                let line = format!(
                    "tick: {}\n",
                    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
                );
                if let Err(e) = tx.send_data(Bytes::from(line)).await {
                    // Client is gone; only this handler stops.
                    log_tick_write_failed(&e.to_string());
                    return;
                }
                tracing::debug!("tick");
            }
            _ = &mut timer => return,
        }
    }
}
