// src/scrape/strategies/paginated.rs
use async_trait::async_trait;
use tracing::warn;

use crate::catalog::SourceDescriptor;
use crate::config::Config;
use crate::models::{RawRecord, SourceError};
use crate::scrape::pace;
use crate::scrape::session::FetchSession;
use crate::scrape::strategy::{
    extract_listing_records, next_page_url, ExtractionStrategy, RESULT_CAP,
};

// Hard bound on pages walked per source, independent of configuration.
const PAGE_CAP: u32 = 5;

/// Paginated list: walk next-page links from the entry page through a
/// bounded number of pages. A broken page mid-walk ends the walk with the
/// results so far; only an unreachable entry page fails the source.
pub struct PaginatedListStrategy;

#[async_trait]
impl ExtractionStrategy for PaginatedListStrategy {
    fn name(&self) -> &'static str {
        "paginatedList"
    }

    async fn extract(
        &self,
        session: &FetchSession,
        source: &SourceDescriptor,
        config: &Config,
    ) -> Result<Vec<RawRecord>, SourceError> {
        let page_bound = config.scraping.max_pages.min(PAGE_CAP);
        let mut page_url = source.url.clone();
        let mut records = Vec::new();

        for page in 0..page_bound {
            let html = if page == 0 {
                session.fetch_page(&page_url).await?
            } else {
                pace(config.scraping.request_delay_ms).await;
                match session.fetch_page(&page_url).await {
                    Ok(html) => html,
                    Err(e) => {
                        warn!(source = %source.name, page, "page fetch failed, stopping walk: {e}");
                        break;
                    }
                }
            };
            records.extend(extract_listing_records(
                &html,
                source.selectors.as_ref(),
                RESULT_CAP,
            ));
            match next_page_url(&html, source.selectors.as_ref(), &page_url) {
                Some(next) if next != page_url => page_url = next,
                _ => break,
            }
        }
        Ok(records)
    }
}
