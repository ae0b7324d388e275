use crate::domain::model::HttpResponse;
use crate::domain::ports::HttpTransport;
use crate::utils::error::Result;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:40.0) Gecko/20100101 Firefox/40.1";

#[derive(Debug, Clone, Default)]
pub struct SessionSettings {
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
}

/// reqwest client with a fixed User-Agent and a cookie jar, so the archive
/// sees one browsing session across result pages.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    settings: SessionSettings,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Result<Self> {
        let user_agent = settings
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT);

        let mut builder = Client::builder().user_agent(user_agent).cookie_store(true);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!("Creating HTTP session (User-Agent: {})", user_agent);
        Ok(Self {
            client: builder.build()?,
            settings,
        })
    }

    pub fn with_user_agent(user_agent: Option<&str>) -> Result<Self> {
        Self::new(SessionSettings {
            user_agent: user_agent.map(str::to_owned),
            timeout: None,
        })
    }

    pub fn user_agent(&self) -> &str {
        self.settings
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }
}

#[async_trait::async_trait]
impl HttpTransport for Session {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        tracing::debug!("HTTP response status: {}", status);

        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            content_disposition,
            body,
        })
    }

    fn renew(&self) -> Result<Self> {
        tracing::info!("🔄 Renewing HTTP session");
        Self::new(self.settings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_session_sends_default_user_agent() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/aad/page")
                .header("User-Agent", DEFAULT_USER_AGENT);
            then.status(200).body("<html></html>");
        });

        let session = Session::with_user_agent(None).unwrap();
        let url = Url::parse(&server.url("/aad/page")).unwrap();
        let response = session.get(&url).await.unwrap();

        page_mock.assert();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"<html></html>");
        assert!(response.content_disposition.is_none());
    }

    #[tokio::test]
    async fn test_session_custom_user_agent_and_content_disposition() {
        let server = MockServer::start();
        let doc_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/aad/doc")
                .header("User-Agent", "cable-crawler-test/1.0");
            then.status(200)
                .header("Content-Disposition", "attachment; filename=\"1977STATE000001.pdf\"")
                .body("%PDF-1.4");
        });

        let session = Session::with_user_agent(Some("cable-crawler-test/1.0")).unwrap();
        assert_eq!(session.user_agent(), "cable-crawler-test/1.0");

        let url = Url::parse(&server.url("/aad/doc")).unwrap();
        let response = session.get(&url).await.unwrap();

        doc_mock.assert();
        assert_eq!(
            response.content_disposition.as_deref(),
            Some("attachment; filename=\"1977STATE000001.pdf\"")
        );
    }

    #[tokio::test]
    async fn test_renewed_session_keeps_user_agent() {
        let session = Session::with_user_agent(Some("cable-crawler-test/2.0")).unwrap();
        let renewed = session.renew().unwrap();
        assert_eq!(renewed.user_agent(), "cable-crawler-test/2.0");
    }
}
