//! Server module
//!
//! Accept loop shared by both binaries. Connections are spawned onto a
//! `LocalSet`, so `run` must be driven from inside one.

mod connection;
mod listener;
mod signal;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::net::TcpListener;

use crate::http::RequestContext;
use crate::logger;
use crate::settings::{LoggingSettings, PerformanceSettings};

pub use listener::create_listener;

/// Per-connection behavior derived from settings
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub keep_alive: bool,
    pub timeout: Duration,
    pub access_log: bool,
    pub access_log_format: String,
}

impl ConnectionSettings {
    pub fn new(performance: &PerformanceSettings, logging: &LoggingSettings) -> Self {
        Self {
            keep_alive: performance.keep_alive,
            timeout: performance.connection_timeout(),
            access_log: logging.access_log,
            access_log_format: logging.access_log_format.clone(),
        }
    }
}

/// Accept connections until SIGINT/SIGTERM, handing each request to `handler`
pub async fn run<H, Fut>(
    listener: TcpListener,
    settings: ConnectionSettings,
    handler: H,
) -> Result<(), Box<dyn std::error::Error>>
where
    H: Fn(RequestContext) -> Fut + Clone + 'static,
    Fut: Future<Output = Response<Full<Bytes>>> + 'static,
{
    let settings = Arc::new(settings);
    let shutdown = signal::wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::handle_connection(
                            stream,
                            peer_addr,
                            Arc::clone(&settings),
                            handler.clone(),
                        );
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            signal = &mut shutdown => {
                match signal {
                    Ok(name) => logger::log_info(&format!("{name} received, shutting down")),
                    Err(e) => {
                        logger::log_error(&format!("Failed to listen for shutdown signals: {e}"));
                        return Err(e.into());
                    }
                }
                return Ok(());
            }
        }
    }
}
