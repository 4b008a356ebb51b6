//! HTTP source for the spreadsheet CSV export.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
}

impl FetchError {
    /// Whether the request gave up because the client timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

/// Anything that can hand back the raw CSV text for a URL.
#[async_trait]
pub trait CsvSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`CsvSource`] backed by a `reqwest` client with a request timeout.
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source whose requests fail after `timeout` instead of hanging.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CsvSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        info!(url = %url, "fetching CSV export");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        info!(bytes = body.len(), "fetched CSV export");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on an ephemeral port and return its URL.
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/export?format=csv")
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[tokio::test]
    async fn fetches_body_on_success() {
        let url = serve_once(http_response("200 OK", "Latitude,Longitude\n1,2\n")).await;
        let source = HttpSource::new(Duration::from_secs(5)).unwrap();
        let body = source.fetch(&url).await.unwrap();
        assert_eq!(body, "Latitude,Longitude\n1,2\n");
    }

    #[tokio::test]
    async fn non_success_status_is_server_error() {
        let url = serve_once(http_response("404 Not Found", "no such sheet")).await;
        let source = HttpSource::new(Duration::from_secs(5)).unwrap();
        let err = source.fetch(&url).await.unwrap_err();
        match err {
            FetchError::Server { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "no such sheet");
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn times_out_instead_of_hanging() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let source = HttpSource::new(Duration::from_millis(200)).unwrap();
        let err = source.fetch(&format!("http://{addr}/")).await.unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {err:?}");
    }

    #[test]
    fn server_error_message() {
        let err = FetchError::Server {
            status: 503,
            body: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "server returned 503: unavailable");
        assert!(!err.is_timeout());
    }
}
