//! In-memory fetcher for unit tests

use crate::crawler::fetcher::{FetchResponse, Fetcher};
use crate::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves canned responses and counts every request per URL
///
/// Unknown URLs fail with a connect error.
#[derive(Default)]
pub(crate) struct StubFetcher {
    responses: HashMap<String, FetchResponse>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_response(self, url: &str, status: u16, redirect_history: Vec<u16>) -> Self {
        self.with_page(url, status, redirect_history, "")
    }

    pub(crate) fn with_body(self, url: &str, status: u16, body: &str) -> Self {
        self.with_page(url, status, Vec::new(), body)
    }

    fn with_page(mut self, url: &str, status: u16, redirect_history: Vec<u16>, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            FetchResponse {
                status,
                final_url: url.to_string(),
                redirect_history,
                body: body.to_string(),
            },
        );
        self
    }

    pub(crate) fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Connect {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

/// Serves a 200 whose headers promise far more body than is ever sent
///
/// Returns the URL to request.
pub(crate) async fn stalled_body_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = [0u8; 1024];
                let _ = stream.read(&mut request).await;
                let _ = stream
                    .write_all(
                        b"HTTP/1.1 200 OK\r\n\
                          Content-Type: video/mp4\r\n\
                          Content-Length: 100000000\r\n\r\nabc",
                    )
                    .await;
                tokio::time::sleep(Duration::from_secs(30)).await;
            });
        }
    });

    format!("http://{}/movie.mp4", addr)
}
