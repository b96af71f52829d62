use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::config::FetchConfig;
use crate::error::ScrapeError;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Transport profile for a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportProfile {
    /// Plain client with a browser user agent.
    Plain,
    /// Full browser header set with a cookie store, for sites behind a
    /// generic bot-challenge layer.
    Browser,
}

/// Blocking HTTP client that fetches one detail page per invocation.
pub struct PageClient {
    http: Client,
}

impl PageClient {
    pub fn new(profile: TransportProfile, config: &FetchConfig) -> Result<Self, ScrapeError> {
        let user_agent = config.user_agent.as_deref().unwrap_or(BROWSER_USER_AGENT);

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(user_agent);

        if profile == TransportProfile::Browser {
            builder = builder
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .default_headers(browser_headers());
        }

        Ok(Self {
            http: builder.build()?,
        })
    }

    /// GET a page and decode the body with the site's charset.
    ///
    /// Returns the decoded body only on HTTP 200; any other status is an
    /// error. No retries, and redirects are left to the transport default.
    pub fn fetch_page(&self, url: &str, charset: &str) -> Result<String, ScrapeError> {
        let resp = self.http.get(url).send()?;
        let status = resp.status();
        if status.as_u16() != 200 {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.text_with_charset(charset)?)
    }
}

/// Default headers that mimic a real browser navigation.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Accept",
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
        ),
    );
    headers.insert("Accept-Language", HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert("DNT", HeaderValue::from_static("1"));
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
    headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
    headers.insert("Sec-Fetch-Site", HeaderValue::from_static("none"));
    headers.insert("Sec-Fetch-User", HeaderValue::from_static("?1"));
    headers.insert("Cache-Control", HeaderValue::from_static("max-age=0"));
    headers
}
