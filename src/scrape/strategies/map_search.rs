// src/scrape/strategies/map_search.rs
use async_trait::async_trait;
use tracing::warn;

use crate::catalog::SourceDescriptor;
use crate::config::Config;
use crate::models::{RawRecord, SourceError};
use crate::scrape::pace;
use crate::scrape::session::FetchSession;
use crate::scrape::strategy::{
    extract_listing_records, path_search_url, ExtractionStrategy, RESULT_CAP, TERM_CAP,
};

/// Map-style search: one path-based search request per term, a bounded term
/// prefix, bounded matches per pass. The first term's fetch doubles as the
/// reachability check for the source.
pub struct MapSearchStrategy;

#[async_trait]
impl ExtractionStrategy for MapSearchStrategy {
    fn name(&self) -> &'static str {
        "mapSearch"
    }

    async fn extract(
        &self,
        session: &FetchSession,
        source: &SourceDescriptor,
        config: &Config,
    ) -> Result<Vec<RawRecord>, SourceError> {
        let terms = source.search_terms.for_kind(source.entity_type);
        let mut records = Vec::new();
        let mut reached = false;

        for (i, term) in terms.iter().take(TERM_CAP).enumerate() {
            if i > 0 {
                pace(config.scraping.request_delay_ms).await;
            }
            let url = path_search_url(&source.url, term);
            let html = match session.fetch_page(&url).await {
                Ok(html) => {
                    reached = true;
                    html
                }
                Err(e) if !reached => return Err(e),
                Err(e) => {
                    warn!(source = %source.name, term = %term, "search fetch failed, skipping term: {e}");
                    continue;
                }
            };
            records.extend(extract_listing_records(
                &html,
                source.selectors.as_ref(),
                RESULT_CAP,
            ));
        }
        Ok(records)
    }
}
