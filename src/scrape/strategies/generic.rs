// src/scrape/strategies/generic.rs
use async_trait::async_trait;

use crate::catalog::SourceDescriptor;
use crate::config::Config;
use crate::models::{RawRecord, SourceError};
use crate::scrape::session::FetchSession;
use crate::scrape::strategy::{extract_listing_records, ExtractionStrategy, RESULT_CAP};

/// Default strategy for absent or unrecognized special types: a single
/// bounded extraction pass over the source's entry page. An empty result is
/// an accepted outcome here, not a failure.
pub struct GenericStrategy;

#[async_trait]
impl ExtractionStrategy for GenericStrategy {
    fn name(&self) -> &'static str {
        "generic"
    }

    async fn extract(
        &self,
        session: &FetchSession,
        source: &SourceDescriptor,
        _config: &Config,
    ) -> Result<Vec<RawRecord>, SourceError> {
        let html = session.fetch_page(&source.url).await?;
        Ok(extract_listing_records(
            &html,
            source.selectors.as_ref(),
            RESULT_CAP,
        ))
    }
}
