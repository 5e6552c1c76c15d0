use std::time::Duration;

use anyhow::Result;
use log::{debug, error};
use rand::Rng;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, HeaderMap, HeaderValue};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Pause before every request. The site serves localized content and is
/// not built for automation; keep the pacing even if it makes multi-week
/// runs slow.
const BASE_DELAY: Duration = Duration::from_secs(3);
const JITTER_MS: std::ops::RangeInclusive<u64> = 500..=1500;

/// Sequential, rate-limited GET wrapper around one shared client.
///
/// `fetch` never fails: transport errors and non-2xx statuses are logged
/// and collapse to an empty string, which callers treat as "no data".
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("de-DE,de;q=0.9,en-US;q=0.8,en;q=0.7"),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(PageFetcher { client })
    }

    /// One throwaway request against the landing page so the session
    /// arrives at the week pages with its cookies already set.
    pub async fn warm_up(&self, base_url: &str) {
        debug!("Priming session against {base_url}");
        let _ = self.fetch(base_url).await;
    }

    /// Rate-limited GET. Returns the body text, or an empty string on
    /// any failure. An empty string means "no data available", not an
    /// empty page.
    pub async fn fetch(&self, url: &str) -> String {
        let jitter = Duration::from_millis(rand::rng().random_range(JITTER_MS));
        tokio::time::sleep(BASE_DELAY + jitter).await;

        debug!("GET {url}");
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    error!("HTTP status {status} for {url}");
                    return String::new();
                }
                match response.text().await {
                    Ok(body) => body,
                    Err(e) => {
                        error!("Failed to read body of {url}: {e}");
                        String::new()
                    }
                }
            }
            Err(e) => {
                error!("Request to {url} failed: {e}");
                String::new()
            }
        }
    }
}
