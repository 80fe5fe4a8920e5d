// src/scrape/session.rs
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::models::SourceError;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; DirectoryHarvester/1.0)";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A pooled fetch worker. Each session owns one HTTP client and is
/// exclusively assigned to a single worker task for the whole run.
#[derive(Debug)]
pub struct FetchSession {
    id: usize,
    client: Client,
}

impl FetchSession {
    pub fn new(id: usize) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { id, client })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Fetch a page body. Network errors and timeouts surface as
    /// `SourceError::Unreachable`; non-success statuses as `SourceError::Status`.
    pub async fn fetch_page(&self, url: &str) -> Result<String, SourceError> {
        debug!(session = self.id, url, "fetching");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| SourceError::Unreachable {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| SourceError::Unreachable {
                url: url.to_string(),
                source,
            })?;
        debug!(session = self.id, url, bytes = body.len(), "fetched");
        Ok(body)
    }
}

/// Build the fixed-size worker pool up front. Any failure here is fatal to
/// the run; sessions built before the failure are dropped (released) on the
/// error path.
pub fn create_session_pool(count: usize) -> Result<Vec<FetchSession>, reqwest::Error> {
    let mut sessions = Vec::with_capacity(count);
    for id in 0..count {
        sessions.push(FetchSession::new(id)?);
    }
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_has_requested_size_and_distinct_ids() {
        let pool = create_session_pool(3).unwrap();
        assert_eq!(pool.len(), 3);
        let ids: Vec<usize> = pool.iter().map(FetchSession::id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
