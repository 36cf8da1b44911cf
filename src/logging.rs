use std::net::SocketAddr;
use tracing::{error, info, warn};

/// Log categories for better visual distinction
pub mod log_cat {
    pub const SERVER: &str = "🚀";
    pub const DELAY: &str = "⏳";
    pub const SHUTDOWN: &str = "🧹";
    pub const ERROR: &str = "❌";
}

/// Server related logs
pub fn log_server_start(addr: &SocketAddr) {
    info!("{} ══════════════════════════════════", log_cat::SERVER);
    info!("{} 🐢 Tarpit", log_cat::SERVER);
    info!("{} ⚡ Listening: http://{}", log_cat::SERVER, addr);
    info!("{} ⏳ Slow: http://{}/slow/10s", log_cat::SERVER, addr);
    info!("{} 💥 Fail: http://{}/fail", log_cat::SERVER, addr);
    info!("{} ══════════════════════════════════", log_cat::SERVER);
}

pub fn log_server_error(error: &str) {
    error!(
        "{} {} Server error: {}",
        log_cat::SERVER,
        log_cat::ERROR,
        error
    );
}

/// Delay handler related logs
pub fn log_request_start(method: &str, uri: &str) {
    info!("{} Request: {} {}", log_cat::DELAY, method, uri);
}

pub fn log_request_finished(uri: &str) {
    info!("{} Finished: {}", log_cat::DELAY, uri);
}

pub fn log_default_delay(default: &str) {
    info!("{} No delay given, using default {}", log_cat::DELAY, default);
}

pub fn log_pausing(delay: &std::time::Duration) {
    info!("{} Pausing for {:?}", log_cat::DELAY, delay);
}

pub fn log_delay_parse_error(input: &str, error: &str) {
    error!(
        "{} {} Failed to parse delay {:?}: {}",
        log_cat::DELAY,
        log_cat::ERROR,
        input,
        error
    );
}

pub fn log_tick_write_failed(error: &str) {
    error!(
        "{} {} Failed to write tick: {}",
        log_cat::DELAY,
        log_cat::ERROR,
        error
    );
}

/// Shutdown related logs
pub fn log_shutdown_signal(signal: &str) {
    info!(
        "{} Received {}, performing graceful shutdown...",
        log_cat::SHUTDOWN,
        signal
    );
}

pub fn log_shutdown_complete() {
    info!("{} ✅ Graceful shutdown completed", log_cat::SHUTDOWN);
}

pub fn log_shutdown_timeout() {
    warn!(
        "{} Shutdown grace period expired with requests still in flight",
        log_cat::SHUTDOWN
    );
}
