use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::SearchConfig;
use crate::models::RawResult;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to build news source client: {0}")]
    Client(String),

    #[error("request to news source failed: {0}")]
    Request(String),

    #[error("news source returned status {0}")]
    Status(u16),
}

/// Stateful search handle: results accumulate across `search` and
/// `get_page` calls until `clear` is invoked. Callers running several
/// searches against one handle must reset it in between so results from a
/// previous search cannot leak into the next.
#[async_trait]
pub trait NewsSource {
    /// Drops accumulated results, the current term and the time range.
    fn clear(&mut self);

    /// Bounds subsequent searches to the inclusive `[start, end]` range.
    fn set_time_range(&mut self, start: NaiveDate, end: NaiveDate);

    /// Runs a fresh search for `term`, fetching the first result page.
    async fn search(&mut self, term: &str) -> Result<(), SourceError>;

    /// Fetches an additional result page for the current term. A no-op
    /// when no search has been run since the last `clear`.
    async fn get_page(&mut self, page: u32) -> Result<(), SourceError>;

    /// Results accumulated so far, in retrieval order.
    fn results(&self) -> &[RawResult];
}

/// Consolidates result-card selectors to avoid per-call parsing.
struct CardSelectors {
    card: Selector,
    link: Selector,
    title: Selector,
    source: Selector,
    date: Selector,
    snippet: Selector,
}

impl CardSelectors {
    fn get() -> Option<&'static Self> {
        static INSTANCE: OnceLock<Option<CardSelectors>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                Some(Self {
                    card: Selector::parse("div.SoaBEf").ok()?,
                    link: Selector::parse("a.WlydOe").ok()?,
                    title: Selector::parse(r#"div[role="heading"]"#).ok()?,
                    source: Selector::parse("div.MgUUmf span").ok()?,
                    date: Selector::parse("div.OSrXXb span").ok()?,
                    snippet: Selector::parse("div.GI74Re").ok()?,
                })
            })
            .as_ref()
    }
}

fn text_of(card: ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .unwrap_or_default()
}

fn parse_results(html: &str) -> Vec<RawResult> {
    let Some(selectors) = CardSelectors::get() else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for card in document.select(&selectors.card) {
        let link = card
            .select(&selectors.link)
            .next()
            .and_then(|el| el.value().attr("href"))
            .unwrap_or_default()
            .to_string();

        // A card without a link is navigation chrome, not a result.
        if link.is_empty() {
            continue;
        }

        results.push(RawResult {
            title: html_escape::decode_html_entities(&text_of(card, &selectors.title))
                .to_string(),
            date: text_of(card, &selectors.date),
            media: text_of(card, &selectors.source),
            desc: html_escape::decode_html_entities(&text_of(card, &selectors.snippet))
                .to_string(),
            link,
        });
    }

    results
}

/// Scraping client for the Google News results page (`tbm=nws`).
///
/// Mirrors the collaborator contract the aggregator expects: mutable
/// per-search state, explicit reset, `%m/%d/%Y` custom date ranges via
/// `tbs=cdr`, and `start`-offset pagination of 10 results per page.
pub struct GoogleNewsClient {
    client: Client,
    base_url: String,
    language: String,
    region: String,
    time_range: Option<(NaiveDate, NaiveDate)>,
    term: Option<String>,
    collected: Vec<RawResult>,
}

impl GoogleNewsClient {
    pub fn new(config: &SearchConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            language: config.language.clone(),
            region: config.region.clone(),
            time_range: None,
            term: None,
            collected: Vec::new(),
        })
    }

    fn build_page_url(&self, term: &str, page: u32) -> Result<Url, SourceError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| SourceError::Client(e.to_string()))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", term)
                .append_pair("tbm", "nws")
                .append_pair("hl", &self.language)
                .append_pair("gl", &self.region)
                .append_pair("num", "10");

            if let Some((start, end)) = self.time_range {
                pairs.append_pair(
                    "tbs",
                    &format!(
                        "cdr:1,cd_min:{},cd_max:{}",
                        start.format("%m/%d/%Y"),
                        end.format("%m/%d/%Y")
                    ),
                );
            }

            if page > 1 {
                pairs.append_pair("start", &((page - 1) * 10).to_string());
            }
        }

        Ok(url)
    }

    async fn fetch_page(&mut self, term: &str, page: u32) -> Result<(), SourceError> {
        let url = self.build_page_url(term, page)?;
        debug!(%url, page, "Fetching news result page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let mut parsed = parse_results(&html);
        debug!(count = parsed.len(), term, page, "Parsed news results");
        self.collected.append(&mut parsed);

        Ok(())
    }
}

#[async_trait]
impl NewsSource for GoogleNewsClient {
    fn clear(&mut self) {
        self.collected.clear();
        self.term = None;
        self.time_range = None;
    }

    fn set_time_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.time_range = Some((start, end));
    }

    async fn search(&mut self, term: &str) -> Result<(), SourceError> {
        self.term = Some(term.to_string());
        self.fetch_page(term, 1).await
    }

    async fn get_page(&mut self, page: u32) -> Result<(), SourceError> {
        let Some(term) = self.term.clone() else {
            return Ok(());
        };
        self.fetch_page(&term, page).await
    }

    fn results(&self) -> &[RawResult] {
        &self.collected
    }
}
