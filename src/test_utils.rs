//! Test fixtures for catalog loading
//!
//! - `StaticSource`: in-memory symbol source that counts fetches
//! - `HttpStub`: minimal HTTP server answering every request with one canned response

use crate::core::{Symbol, SymbolSource};
use crate::{CatalogError, Result};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// In-memory source returning a fixed listing
pub struct StaticSource {
    symbols: Vec<Symbol>,
    delay: Duration,
    delay_first_only: bool,
    failures_left: AtomicUsize,
    failure_status: u16,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self {
            symbols,
            delay: Duration::ZERO,
            delay_first_only: false,
            failures_left: AtomicUsize::new(0),
            failure_status: 500,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep before answering, to widen race windows
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sleep before answering the first fetch only
    pub fn with_first_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self.delay_first_only = true;
        self
    }

    /// Fail the first `times` fetches with HTTP `status`
    pub fn failing(mut self, times: usize, status: u16) -> Self {
        self.failures_left = AtomicUsize::new(times);
        self.failure_status = status;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SymbolSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_symbols(&self) -> Result<Vec<Symbol>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() && (!self.delay_first_only || call == 0) {
            tokio::time::sleep(self.delay).await;
        }
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(CatalogError::Http(self.failure_status));
        }
        Ok(self.symbols.clone())
    }
}

/// One-response HTTP server bound to an ephemeral localhost port
pub struct HttpStub {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl HttpStub {
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            if status == 200 { "OK" } else { "Error" },
            body.len(),
            body
        );

        let task = {
            let hits = hits.clone();
            let requests = requests.clone();
            tokio::spawn(async move {
                while let Ok((mut socket, _)) = listener.accept().await {
                    hits.fetch_add(1, Ordering::SeqCst);

                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        let n = socket.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        buf.extend_from_slice(&chunk[..n]);
                        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    requests
                        .lock()
                        .unwrap()
                        .push(String::from_utf8_lossy(&buf).into_owned());

                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
            })
        };

        Self {
            addr,
            hits,
            requests,
            task,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Connections accepted so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<String> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Drop for HttpStub {
    fn drop(&mut self) {
        self.task.abort();
    }
}
