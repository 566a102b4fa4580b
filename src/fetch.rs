use crate::config::CrawlerConfig;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use url::Url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Outcome of a single GET request
#[derive(Debug, Clone)]
pub struct PageFetchResult {
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` header, if any
    pub content_type: Option<String>,
    /// Response body; only read for 200 responses
    pub body: Option<String>,
}

impl PageFetchResult {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

/// Page source for the menu crawler
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<PageFetchResult, FetchError>;
}

/// `reqwest`-backed fetcher with a desktop browser User-Agent and a fixed timeout
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Read the body chunk by chunk, stopping at `max_body_bytes`
    async fn read_body(&self, mut response: Response, url: &Url) -> Result<String, FetchError> {
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if append_capped(&mut body, &chunk, self.max_body_bytes) {
                ::log::debug!(
                    "Body of {} cut off at {} bytes",
                    url,
                    self.max_body_bytes
                );
                break;
            }
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Append as much of `chunk` as fits under `cap`; `true` once the cap is reached
fn append_capped(body: &mut Vec<u8>, chunk: &[u8], cap: usize) -> bool {
    let room = cap.saturating_sub(body.len());
    if chunk.len() > room {
        body.extend_from_slice(&chunk[..room]);
        return true;
    }
    body.extend_from_slice(chunk);
    body.len() >= cap
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<PageFetchResult, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = if status == StatusCode::OK {
            Some(self.read_body(response, url).await?)
        } else {
            None
        };

        Ok(PageFetchResult {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
