// Server loop module
// Accepts connections until shutdown is requested

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Interval between checks of the active connection count while draining
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Accept loop
///
/// Runs until `shutdown` is notified, then closes the listener and waits for
/// accepted connections to finish. The wait is bounded by
/// `performance.connection_timeout` (0 waits indefinitely).
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => break,
        }
    }

    drop(listener);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst));

    let grace_secs = state.config.performance.connection_timeout;
    let drain = wait_for_connections(&active_connections);
    if grace_secs == 0 {
        drain.await;
    } else if tokio::time::timeout(Duration::from_secs(grace_secs), drain)
        .await
        .is_err()
    {
        logger::log_warning(&format!(
            "Shutdown grace period of {grace_secs}s elapsed with {} connection(s) open",
            active_connections.load(Ordering::SeqCst)
        ));
    }

    Ok(())
}

/// Resolve once no accepted connection is still being served
async fn wait_for_connections(active_connections: &AtomicUsize) {
    while active_connections.load(Ordering::SeqCst) > 0 {
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::Config;
    use crate::server::create_reusable_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn send(addr: std::net::SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        String::from_utf8(raw).unwrap()
    }

    fn header<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
        let head = raw.split("\r\n\r\n").next()?;
        head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    #[tokio::test]
    async fn test_serves_etag_revalidation_over_tcp() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();

        let mut config = Config::default();
        config.logging.access_log = false;
        let state = Arc::new(AppState::with_clock(
            config,
            Arc::new(FixedClock::at(1_700_000_000)),
        ));
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(start_server_loop(listener, state, Arc::clone(&shutdown)));

        let first = send(
            addr,
            "GET /etag.css HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(first.starts_with("HTTP/1.1 200"), "{first}");
        assert_eq!(header(&first, "cache-control"), Some("must-revalidate"));
        assert_eq!(header(&first, "content-type"), Some("text/css"));
        let etag = header(&first, "etag").unwrap().to_string();
        assert_eq!(etag, "\"13:00\"");
        assert!(first.contains("#etag-timestamp::before"));

        let second = send(
            addr,
            &format!(
                "GET /etag.css HTTP/1.1\r\nHost: localhost\r\nIf-None-Match: {etag}\r\nConnection: close\r\n\r\n"
            ),
        )
        .await;
        assert!(second.starts_with("HTTP/1.1 304"), "{second}");
        assert!(header(&second, "etag").is_none());
        assert!(header(&second, "cache-control").is_none());

        let home = send(
            addr,
            "GET /anything HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(home.starts_with("HTTP/1.1 200"));
        assert_eq!(header(&home, "cache-control"), Some("private"));

        shutdown.notify_one();
        server.await.unwrap().unwrap();
    }

    fn test_state(configure: impl FnOnce(&mut Config)) -> Arc<AppState> {
        let mut config = Config::default();
        config.logging.access_log = false;
        configure(&mut config);
        Arc::new(AppState::with_clock(
            config,
            Arc::new(FixedClock::at(1_700_000_000)),
        ))
    }

    /// Give the accept loop a chance to pick up pending connections
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_in_flight_request_completes_after_shutdown() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(start_server_loop(
            listener,
            test_state(|_| {}),
            Arc::clone(&shutdown),
        ));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /immutable.css HTTP/1.1\r\nHost: loc")
            .await
            .unwrap();
        settle().await;

        shutdown.notify_one();
        settle().await;
        assert!(!server.is_finished(), "loop returned with a request in flight");

        stream
            .write_all(b"alhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        let response = String::from_utf8(raw).unwrap();
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert_eq!(header(&response, "cache-control"), Some("immutable"));

        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("loop finished after the last connection closed")
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_rejects_connections_over_limit() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(start_server_loop(
            listener,
            test_state(|c| c.performance.max_connections = Some(1)),
            Arc::clone(&shutdown),
        ));

        // Holds the only slot without sending anything
        let held = TcpStream::connect(addr).await.unwrap();
        settle().await;

        let mut rejected = TcpStream::connect(addr).await.unwrap();
        let _ = rejected
            .write_all(b"GET /etag.css HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await;
        let mut raw = Vec::new();
        // Either a clean EOF or a reset, but never a response
        let _ = tokio::time::timeout(Duration::from_secs(5), rejected.read_to_end(&mut raw))
            .await
            .expect("rejected connection was closed");
        assert!(raw.is_empty(), "{raw:?}");

        drop(held);
        settle().await;
        let response = send(
            addr,
            "GET /etag.css HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");

        shutdown.notify_one();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_idle_keep_alive_connection_times_out() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(start_server_loop(
            listener,
            test_state(|c| c.performance.connection_timeout = 1),
            Arc::clone(&shutdown),
        ));

        let started = std::time::Instant::now();
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /max-age.css HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();

        // Keep-alive leaves the connection open after the response; only the
        // connection timeout closes it
        let mut raw = Vec::new();
        tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut raw))
            .await
            .expect("connection closed by the server")
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(900));
        let response = String::from_utf8(raw).unwrap();
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");

        shutdown.notify_one();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_stops_on_shutdown() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let state = Arc::new(AppState::new(Config::default()));
        let shutdown = Arc::new(Notify::new());

        // A stored permit ends the loop even if it arrives before the first poll
        shutdown.notify_one();
        start_server_loop(listener, state, shutdown).await.unwrap();
    }
}
