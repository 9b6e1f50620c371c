// Connection handling module
// Serves one accepted TCP connection with hyper's HTTP/1 server

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;

use super::ConnectionSettings;
use crate::http::RequestContext;
use crate::logger::{self, AccessLogEntry};

/// Handle a single connection in a local task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Serves HTTP/1.1 with the configured keep-alive
/// 3. Writes one access log line per request when enabled
/// 4. Drops the connection once the timeout elapses
pub fn handle_connection<H, Fut>(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    settings: Arc<ConnectionSettings>,
    handler: H,
) where
    H: Fn(RequestContext) -> Fut + Clone + 'static,
    Fut: Future<Output = Response<Full<Bytes>>> + 'static,
{
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);
        let timeout = settings.timeout;

        let mut builder = http1::Builder::new();
        builder.keep_alive(settings.keep_alive);

        let service = service_fn(move |req: Request<Incoming>| {
            let handler = handler.clone();
            let settings = Arc::clone(&settings);
            async move {
                let started = Instant::now();
                let ctx = RequestContext::from_request(&req);
                let entry = settings
                    .access_log
                    .then(|| AccessLogEntry::from_request(peer_addr, &req));

                let response = handler(ctx).await;

                if let Some(mut entry) = entry {
                    let body_bytes = response.body().size_hint().exact().unwrap_or(0);
                    entry.finish(response.status().as_u16(), body_bytes, started.elapsed());
                    logger::log_access(&entry, &settings.access_log_format);
                }
                Ok::<_, Infallible>(response)
            }
        });

        match tokio::time::timeout(timeout, builder.serve_connection(io, service)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_info(&format!(
                "Connection from {peer_addr} closed after {} seconds",
                timeout.as_secs()
            )),
        }
    });
}
