//! Feed sources: published spreadsheet URL, local file, or fixed text.
//!
//! [`HttpFeed`] appends a `t=<epoch millis>` query parameter on every
//! request so that intermediate caches never serve an old export. There are
//! no automatic retries; a retry is simply another call to
//! [`FeedSource::fetch`].

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::{FeedError, FeedSource};

/// Query parameter carrying the cache-busting timestamp.
pub const CACHE_BUST_PARAM: &str = "t";

/// Per-request timeout for the feed download.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Appends the cache-busting parameter to `url`.
///
/// Any fragment is dropped, since it is never sent to the server anyway.
#[must_use]
pub fn cache_busted_url(url: &str, millis: i64) -> String {
    let base = url.split('#').next().unwrap_or(url);
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{CACHE_BUST_PARAM}={millis}")
}

/// Fetches the feed from a published spreadsheet CSV export URL.
#[derive(Debug, Clone)]
pub struct HttpFeed {
    url: String,
    client: reqwest::Client,
}

impl HttpFeed {
    /// Creates a feed for `url` with a default client.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the HTTP client cannot be built.
    pub fn new(url: &str) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("course-portal/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(url, client))
    }

    /// Creates a feed for `url` that reuses an existing client.
    #[must_use]
    pub fn with_client(url: &str, client: reqwest::Client) -> Self {
        Self {
            url: url.to_owned(),
            client,
        }
    }

    /// The feed URL, without the cache-busting parameter.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String, FeedError> {
        let request_url = cache_busted_url(&self.url, chrono::Utc::now().timestamp_millis());
        log::debug!("GET {request_url}");

        let response = self.client.get(&request_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let text = response.text().await?;
        log::debug!("Downloaded {} bytes from {}", text.len(), self.url);
        Ok(text)
    }
}

/// Reads the feed from a CSV file on disk.
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    /// Creates a feed backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeed {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, FeedError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

/// A feed with fixed contents.
#[derive(Debug, Clone)]
pub struct StaticFeed {
    text: String,
}

impl StaticFeed {
    /// Creates a feed that always returns `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
        }
    }
}

#[async_trait]
impl FeedSource for StaticFeed {
    fn describe(&self) -> String {
        format!("static feed ({} bytes)", self.text.len())
    }

    async fn fetch(&self) -> Result<String, FeedError> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpListener;

    use super::*;

    /// Serves exactly one HTTP response and hands back the request line.
    async fn serve_once(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf[..n])
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });
        (format!("http://{addr}/feed.csv"), handle)
    }

    #[test]
    fn appends_timestamp_with_question_mark() {
        assert_eq!(
            cache_busted_url("https://host/pub?output=csv", 42),
            "https://host/pub?output=csv&t=42"
        );
        assert_eq!(cache_busted_url("https://host/feed.csv", 7), "https://host/feed.csv?t=7");
    }

    #[test]
    fn drops_fragment_before_appending() {
        assert_eq!(
            cache_busted_url("https://host/feed.csv#gid=0", 1),
            "https://host/feed.csv?t=1"
        );
    }

    #[tokio::test]
    async fn static_feed_returns_its_text() {
        let feed = StaticFeed::new("code,title\nCS101,Intro");
        assert_eq!(feed.fetch().await.unwrap(), "code,title\nCS101,Intro");
    }

    #[tokio::test]
    async fn file_feed_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "code,title\nMA201,Linear Algebra").unwrap();

        let feed = FileFeed::new(file.path());
        assert_eq!(feed.fetch().await.unwrap(), "code,title\nMA201,Linear Algebra");
    }

    #[tokio::test]
    async fn file_feed_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let feed = FileFeed::new(dir.path().join("absent.csv"));
        assert!(matches!(feed.fetch().await, Err(FeedError::Io(_))));
    }

    #[tokio::test]
    async fn http_feed_returns_body_and_busts_cache() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: 17\r\nConnection: close\r\n\r\ncode,title\nC1,T1\n",
        )
        .await;

        let feed = HttpFeed::new(&url).unwrap();
        let body = feed.fetch().await.unwrap();
        assert_eq!(body, "code,title\nC1,T1\n");

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /feed.csv?t="), "{request_line}");
    }

    #[tokio::test]
    async fn http_feed_non_success_is_status_error() {
        let (url, server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let feed = HttpFeed::new(&url).unwrap();
        let err = feed.fetch().await.unwrap_err();
        match &err {
            FeedError::Status { status, url: u } => {
                assert_eq!(*status, 404);
                assert_eq!(u, &url);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("HTTP 404"));
        server.await.unwrap();
    }
}
