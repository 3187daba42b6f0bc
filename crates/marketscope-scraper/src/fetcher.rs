//! Bounded page retrieval.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::FetchError;
use crate::html::{extract_page_text, PageText};
use crate::keywords::keyword_hits;

/// Normalized text fields of a fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageContent {
    pub url: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub keyword_hits: Vec<String>,
}

/// Fetches a page with one bounded GET and extracts its text.
///
/// A response counts as a failure when the status is non-2xx, the declared
/// content type is not HTML, or the body exceeds `max_body_bytes`.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
    max_body_bytes: usize,
    max_chars: usize,
}

impl ContentFetcher {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_body_bytes: usize,
        max_chars: usize,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_body_bytes,
            max_chars,
        })
    }

    /// Fetch `url` and report which of `keywords` appear in its text.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`]: not an absolute `http`/`https` URL.
    /// - [`FetchError::UnexpectedStatus`]: any non-2xx response.
    /// - [`FetchError::UnsupportedContentType`]: a declared non-HTML body.
    /// - [`FetchError::BodyTooLarge`]: more than `max_body_bytes` received.
    /// - [`FetchError::Http`]: network, TLS or timeout failure.
    pub async fn fetch(&self, url: &str, keywords: &[&str]) -> Result<PageContent, FetchError> {
        let parsed = parse_http_url(url)?;
        tracing::debug!(url = %parsed, "fetching page");

        let mut response = self
            .client
            .get(parsed)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.5",
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.to_ascii_lowercase().contains("html") {
                return Err(FetchError::UnsupportedContentType {
                    content_type: content_type.to_string(),
                    url: url.to_string(),
                });
            }
        }

        let too_large = || FetchError::BodyTooLarge {
            url: url.to_string(),
            limit: self.max_body_bytes,
        };

        if response
            .content_length()
            .is_some_and(|len| usize::try_from(len).map_or(true, |len| len > self.max_body_bytes))
        {
            return Err(too_large());
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        let html = String::from_utf8_lossy(&body);
        let PageText {
            title,
            description,
            content,
        } = extract_page_text(&html, self.max_chars);

        let searchable = format!("{title} {description} {content}");
        let keyword_hits = keyword_hits(&searchable, keywords);

        tracing::debug!(
            url,
            title_len = title.len(),
            content_chars = content.chars().count(),
            hits = keyword_hits.len(),
            "page extracted"
        );

        Ok(PageContent {
            url: url.to_string(),
            title,
            description,
            content,
            keyword_hits,
        })
    }
}

/// Parse `url`, accepting only absolute `http`/`https` URLs.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] for unparseable input or other schemes.
pub fn parse_http_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}
