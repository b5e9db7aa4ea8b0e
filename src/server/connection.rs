// Connection handling module
// Accepts a TCP connection and serves it with hyper

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::api;
use crate::config;
use crate::logger;

/// Accept and process a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<config::AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment first, then check, so concurrent accepts cannot both slip under the limit
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
}

/// Serve a single connection in a spawned task.
///
/// Request headers must arrive within `read_timeout`. A keep-alive connection
/// is asked to close once `keep_alive_timeout` has passed; a request already
/// in flight still gets its response. The counter is decremented when the
/// connection ends either way.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<config::AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let performance = state.config.performance.clone();

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(performance.keep_alive_timeout > 0);
        if performance.read_timeout > 0 {
            builder.header_read_timeout(Duration::from_secs(performance.read_timeout));
        }

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| api::handle_request(req, Arc::clone(&state), peer_addr)),
        );
        tokio::pin!(conn);

        let keep_alive_limit = tokio::time::sleep(Duration::from_secs(performance.keep_alive_timeout));
        tokio::pin!(keep_alive_limit);
        let mut closing = performance.keep_alive_timeout == 0;

        let result = loop {
            tokio::select! {
                result = conn.as_mut() => break result,
                () = &mut keep_alive_limit, if !closing => {
                    closing = true;
                    logger::log_debug(&format!(
                        "Connection from {peer_addr} open for {}s, closing after current request",
                        performance.keep_alive_timeout
                    ));
                    conn.as_mut().graceful_shutdown();
                }
            }
        };

        match result {
            Ok(()) => {}
            Err(err) if err.is_timeout() => {
                logger::log_debug(&format!("Connection from {peer_addr} timed out reading headers"));
            }
            Err(err) => logger::log_connection_error(&err),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
