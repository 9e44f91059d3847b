pub mod domain;
pub mod format;
pub mod geo;
pub mod ingest;
pub mod time;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub feed_url: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                feed_url: std::env::var("PHARMACY_FEED_URL").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_feed_url(&self) -> anyhow::Result<&str> {
            self.feed_url
                .as_deref()
                .context("PHARMACY_FEED_URL is required")
        }
    }
}
