// src/ingest/providers/feed_rss.rs
// Generic RSS 2.0 provider: turns channel items into ingestion candidates.
// Two modes, mirrored by cargo features: embedded fixture XML for tests and
// local runs, HTTP fetching for production feeds.

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::providers::normalize_title;
use crate::ingest::types::{Candidate, FeedProvider};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<RssItem>,
}
#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

pub struct FeedRssProvider {
    mode: Mode,
}

enum Mode {
    // Own copy of the XML so tests don't need 'static fixtures.
    #[cfg(feature = "ingest-fixtures")]
    Fixture(String),
    #[cfg(feature = "ingest-http")]
    Http {
        url: String,
        client: reqwest::Client,
    },
}

impl FeedRssProvider {
    #[cfg(feature = "ingest-fixtures")]
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    #[cfg(feature = "ingest-http")]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                client: reqwest::Client::new(),
            },
        }
    }

    fn parse_candidates_from_str(s: &str) -> Result<Vec<Candidate>> {
        let t0 = std::time::Instant::now();
        let xml_clean = scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean).context("parsing rss xml")?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let title = it.title.unwrap_or_default();
            let link = it.link.unwrap_or_default();
            if title.is_empty() || link.is_empty() {
                continue;
            }
            let normalized = normalize_title(&title);
            out.push(Candidate {
                title,
                link,
                published_raw: it.pub_date,
                normalized_title: normalized,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_candidates_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl FeedProvider for FeedRssProvider {
    async fn fetch_latest(&self) -> Result<Vec<Candidate>> {
        match &self.mode {
            #[cfg(feature = "ingest-fixtures")]
            Mode::Fixture(s) => Self::parse_candidates_from_str(s),

            #[cfg(feature = "ingest-http")]
            Mode::Http { url, client } => {
                let body = match client.get(url).send().await {
                    Ok(resp) => resp.text().await.context("rss http .text()")?,
                    Err(e) => {
                        tracing::warn!(error = ?e, url, "feed http error");
                        counter!("ingest_provider_errors_total").increment(1);
                        return Err(e).context("rss http get()");
                    }
                };
                Self::parse_candidates_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "rss"
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
