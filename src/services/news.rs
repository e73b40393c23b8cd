use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::clients::google_news::{NewsSource, SourceError};
use crate::config::Config;
use crate::models::{NewsRecord, RawResult};
use crate::services::allowlist::AllowList;
use crate::services::canonical::canonicalize;
use crate::services::dates;
use crate::services::images::ImageExtractor;

/// One search request after query-parameter defaults have been applied.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Possibly compound: sub-terms joined with ` OR `.
    pub term: String,
    pub days_back: i64,
    /// Case-insensitive substring filter on the outlet name.
    pub source_filter: Option<String>,
    pub pages: u32,
    pub fetch_images: bool,
}

/// Runs the result-processing pipeline: per-sub-term fan-out against the
/// search handle, canonical-link deduplication, source filtering, optional
/// image extraction, and recency sorting.
pub struct NewsService {
    allowlist: AllowList,
    images: ImageExtractor,
}

impl NewsService {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            allowlist: AllowList::new(&config.filters.allowed_domains),
            images: ImageExtractor::new(&config.images)?,
        })
    }

    pub async fn search<S>(
        &self,
        source: &mut S,
        request: &SearchRequest,
    ) -> Result<Vec<NewsRecord>, SourceError>
    where
        S: NewsSource + Send,
    {
        let raw = Self::gather(source, request).await?;
        info!(term = %request.term, raw = raw.len(), "Aggregated raw results");
        Ok(self.assemble(&raw, request).await)
    }

    /// Fans the compound term out into one search per sub-term, merging
    /// results in first-seen order and dropping later entries whose
    /// canonical link was already seen.
    async fn gather<S>(
        source: &mut S,
        request: &SearchRequest,
    ) -> Result<Vec<RawResult>, SourceError>
    where
        S: NewsSource + Send,
    {
        let end = Utc::now().date_naive();
        let start = end - Duration::days(request.days_back);

        let mut merged = Vec::new();
        let mut seen = HashSet::new();

        for sub_term in request.term.split(" OR ") {
            let sub_term = sub_term.trim();
            if sub_term.is_empty() {
                continue;
            }

            // The handle keeps per-search state; reset it so results from
            // the previous sub-term cannot leak into this one.
            source.clear();
            source.set_time_range(start, end);
            source.search(sub_term).await?;
            for page in 2..=request.pages {
                source.get_page(page).await?;
            }

            for result in source.results() {
                let key = canonicalize(&result.link);
                if seen.insert(key) {
                    merged.push(result.clone());
                }
            }
            debug!(sub_term, merged = merged.len(), "Merged sub-term results");
        }

        Ok(merged)
    }

    /// Filters, shapes and sorts the merged raw results into the response
    /// records.
    async fn assemble(&self, raw: &[RawResult], request: &SearchRequest) -> Vec<NewsRecord> {
        let source_filter = request.source_filter.as_deref().map(str::to_lowercase);

        // Keyed by canonical link: if two ordinals somehow canonicalize to
        // the same link, the later record wins.
        let mut by_link: HashMap<String, (DateTime<Utc>, NewsRecord)> = HashMap::new();

        for (ordinal, result) in raw.iter().enumerate() {
            if let Some(ref filter) = source_filter
                && !result.media.to_lowercase().contains(filter)
            {
                continue;
            }

            let link = canonicalize(&result.link);
            if self.allowlist.is_configured() && !self.allowlist.allows(&link) {
                debug!(%link, "Dropped by allow-list");
                continue;
            }

            let image = if request.fetch_images {
                self.images.extract(&link).await
            } else {
                None
            };

            let resolved = dates::resolve(&result.date);
            let record = NewsRecord {
                // Ordinals index the raw pre-filter sequence, so filtered
                // entries leave gaps in the ids.
                id: format!("{}-{ordinal}", request.term),
                title: result.title.clone(),
                date: result.date.clone(),
                source: result.media.clone(),
                description: if result.desc.is_empty() {
                    None
                } else {
                    Some(result.desc.clone())
                },
                link: link.clone(),
                image,
                search_term: request.term.clone(),
            };
            by_link.insert(link, (resolved, record));
        }

        let mut dated: Vec<(DateTime<Utc>, NewsRecord)> = by_link.into_values().collect();
        dated.sort_by(|a, b| b.0.cmp(&a.0));
        dated.into_iter().map(|(_, record)| record).collect()
    }
}
