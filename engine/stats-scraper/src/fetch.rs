use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

/// Something that can hand back the HTML of a page
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    /// Create a new HTTP page source
    pub fn new() -> Result<Self> {
        let client = Client::builder().build().context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        info!("Fetching data from: {}", url);

        let response = self.client.get(url).send().await.context("Failed to fetch page")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP request failed with status: {}", response.status());
        }

        let body = response.bytes().await.context("Failed to read response body")?;
        let html = decode_body(body.to_vec())?;
        info!("Successfully fetched HTML ({} bytes)", html.len());

        Ok(html)
    }
}

/// Page bodies must be valid UTF-8
fn decode_body(body: Vec<u8>) -> Result<String> {
    String::from_utf8(body).context("Response body is not valid UTF-8")
}

/// Serves the same HTML for every URL
#[derive(Debug, Clone)]
pub struct StaticPageSource {
    html: String,
}

impl StaticPageSource {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn fetch_html(&self, _url: &str) -> Result<String> {
        Ok(self.html.clone())
    }
}
