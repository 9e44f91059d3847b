use crate::config::Settings;
use crate::ingest::types::RawEntry;
use crate::ingest::xml;
use anyhow::{Context, Result};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRIES: u32 = 3;

#[async_trait::async_trait]
pub trait PharmacyFeedSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// Fetch the current on-call feed as raw entries, in feed order.
    async fn fetch_entries(&self) -> Result<Vec<RawEntry>>;
}

#[derive(Debug, Clone)]
pub struct HttpXmlFeedSource {
    http: reqwest::Client,
    feed_url: String,
    retries: u32,
}

impl HttpXmlFeedSource {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let feed_url = settings.require_feed_url()?.to_string();

        let timeout_secs = std::env::var("PHARMACY_FEED_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("PHARMACY_FEED_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES);

        Self::new(feed_url, Duration::from_secs(timeout_secs), retries)
    }

    pub fn new(feed_url: impl Into<String>, timeout: Duration, retries: u32) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build feed http client")?;

        Ok(Self {
            http,
            feed_url: feed_url.into(),
            retries: retries.max(1),
        })
    }

    async fn fetch_once(&self) -> Result<Vec<RawEntry>> {
        let res = self
            .http
            .get(&self.feed_url)
            .send()
            .await
            .context("pharmacy feed request failed")?;

        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("pharmacy feed HTTP {status}");
        }

        let body = res.text().await.context("failed to read feed response")?;
        tracing::debug!(bytes = body.len(), "fetched feed XML");

        let entries = xml::parse_feed(&body).context("failed to parse feed XML")?;
        Ok(entries)
    }
}

#[async_trait::async_trait]
impl PharmacyFeedSource for HttpXmlFeedSource {
    fn source_name(&self) -> &'static str {
        "upstream_xml_http"
    }

    async fn fetch_entries(&self) -> Result<Vec<RawEntry>> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once().await {
                Ok(entries) => return Ok(entries),
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(attempt, ?backoff, error = %err, "feed fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}
