use crate::domain::ports::HttpTransport;
use crate::utils::error::{CrawlError, Result};
use regex::bytes::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

static META_REFRESH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)http-equiv=['"]refresh['"]"#).expect("valid meta refresh pattern")
});

/// Waits used between retries.
///
/// A transient server error (500/503) is retried once after
/// `server_error_delay` (page fetches) or `download_retry_delay` (documents).
/// A meta-refresh interstitial is polled every `refresh_delay` for as long as
/// the archive keeps serving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub server_error_delay: Duration,
    pub refresh_delay: Duration,
    pub download_retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            server_error_delay: Duration::from_secs(5),
            refresh_delay: Duration::from_secs(1),
            download_retry_delay: Duration::from_secs(20),
        }
    }
}

impl RetryPolicy {
    pub fn without_delays() -> Self {
        Self {
            server_error_delay: Duration::ZERO,
            refresh_delay: Duration::ZERO,
            download_retry_delay: Duration::ZERO,
        }
    }
}

/// True if the page is the archive's "query is being processed" reload page.
pub fn is_meta_refresh(page: &[u8]) -> bool {
    META_REFRESH_PATTERN.is_match(page)
}

pub struct PageFetcher<T: HttpTransport> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: HttpTransport> PageFetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Fetches `url` until a page that is not a meta-refresh interstitial
    /// arrives. A 500/503 is retried once; the next failure is fatal.
    pub async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        loop {
            let mut response = self.transport.get(url).await?;

            if response.is_transient_server_error() {
                tracing::warn!(
                    "⚠️ Server error {} for {}, retrying in {:?}",
                    response.status,
                    url,
                    self.policy.server_error_delay
                );
                tokio::time::sleep(self.policy.server_error_delay).await;
                response = self.transport.get(url).await?;
            }

            if !response.is_success() {
                return Err(CrawlError::FatalFetchError {
                    url: url.to_string(),
                    status: response.status,
                });
            }

            if !is_meta_refresh(&response.body) {
                return Ok(response.body);
            }

            tracing::debug!("Query still processing at {}, polling again", url);
            tokio::time::sleep(self.policy.refresh_delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::ScriptedTransport;

    const INTERSTITIAL: &str =
        r#"<html><head><META HTTP-EQUIV="Refresh" CONTENT="1"></head><body>Processing</body></html>"#;

    fn url() -> Url {
        Url::parse("https://aad.archives.gov/aad/display-partial-records.jsp?dt=2532").unwrap()
    }

    #[test]
    fn test_meta_refresh_detection_is_case_insensitive() {
        assert!(is_meta_refresh(INTERSTITIAL.as_bytes()));
        assert!(is_meta_refresh(b"<meta http-equiv='refresh' content='2'>"));
        assert!(!is_meta_refresh(b"<meta http-equiv=\"content-type\">"));
        assert!(!is_meta_refresh(b"<p>refresh the page</p>"));
    }

    #[tokio::test]
    async fn test_fetch_returns_page_body() {
        let transport = ScriptedTransport::new().respond(200, "<table></table>");
        let fetcher = PageFetcher::new(transport.clone(), RetryPolicy::without_delays());

        let page = fetcher.fetch(&url()).await.unwrap();

        assert_eq!(page, b"<table></table>");
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_retries_once_after_server_error() {
        let transport = ScriptedTransport::new()
            .respond(500, "busy")
            .respond(200, "<table></table>");
        let fetcher = PageFetcher::new(transport.clone(), RetryPolicy::without_delays());

        let page = fetcher.fetch(&url()).await.unwrap();

        assert_eq!(page, b"<table></table>");
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_second_server_error_is_fatal() {
        let transport = ScriptedTransport::new()
            .respond(503, "busy")
            .respond(500, "still busy")
            .respond(200, "never requested");
        let fetcher = PageFetcher::new(transport.clone(), RetryPolicy::without_delays());

        let err = fetcher.fetch(&url()).await.unwrap_err();

        assert!(matches!(err, CrawlError::FatalFetchError { status: 500, .. }));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_client_error_is_not_retried() {
        let transport = ScriptedTransport::new().respond(404, "missing");
        let fetcher = PageFetcher::new(transport.clone(), RetryPolicy::without_delays());

        let err = fetcher.fetch(&url()).await.unwrap_err();

        assert!(matches!(err, CrawlError::FatalFetchError { status: 404, .. }));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_polls_through_interstitial_pages() {
        let transport = ScriptedTransport::new()
            .respond(200, INTERSTITIAL)
            .respond(200, INTERSTITIAL)
            .respond(500, "busy")
            .respond(200, INTERSTITIAL)
            .respond(200, "<table id=\"queryResults\"></table>");
        let fetcher = PageFetcher::new(transport.clone(), RetryPolicy::without_delays());

        let page = fetcher.fetch(&url()).await.unwrap();

        assert_eq!(page, b"<table id=\"queryResults\"></table>");
        assert_eq!(transport.requests().len(), 5);
    }
}
