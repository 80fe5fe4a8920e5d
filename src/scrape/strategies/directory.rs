// src/scrape/strategies/directory.rs
use async_trait::async_trait;
use tracing::warn;

use crate::catalog::SourceDescriptor;
use crate::config::Config;
use crate::models::{RawRecord, SourceError};
use crate::scrape::pace;
use crate::scrape::session::FetchSession;
use crate::scrape::strategy::{
    extract_listing_records, search_url, ExtractionStrategy, RESULT_CAP, TERM_CAP,
};

/// Directory listing: extract the entry page, then issue one query-string
/// search per term (bounded prefix), concatenating results. Failed term
/// searches are skipped; only an unreachable entry page fails the source.
pub struct DirectoryListingStrategy;

#[async_trait]
impl ExtractionStrategy for DirectoryListingStrategy {
    fn name(&self) -> &'static str {
        "directoryListing"
    }

    async fn extract(
        &self,
        session: &FetchSession,
        source: &SourceDescriptor,
        config: &Config,
    ) -> Result<Vec<RawRecord>, SourceError> {
        let entry_html = session.fetch_page(&source.url).await?;
        let mut records =
            extract_listing_records(&entry_html, source.selectors.as_ref(), RESULT_CAP);

        for term in source
            .search_terms
            .for_kind(source.entity_type)
            .iter()
            .take(TERM_CAP)
        {
            pace(config.scraping.request_delay_ms).await;
            let url = search_url(&source.url, "q", term);
            match session.fetch_page(&url).await {
                Ok(html) => records.extend(extract_listing_records(
                    &html,
                    source.selectors.as_ref(),
                    RESULT_CAP,
                )),
                Err(e) => {
                    warn!(source = %source.name, term = %term, "search fetch failed, skipping term: {e}");
                }
            }
        }
        Ok(records)
    }
}
