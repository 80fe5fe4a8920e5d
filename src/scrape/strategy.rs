// src/scrape/strategy.rs
use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use url::Url;

use crate::catalog::{Selectors, SourceDescriptor};
use crate::config::Config;
use crate::models::{RawRecord, SourceError};
use crate::normalize::extract_contact_info;
use crate::scrape::session::FetchSession;
use crate::scrape::strategies::{
    DirectoryListingStrategy, GenericStrategy, MapSearchStrategy, PaginatedListStrategy,
};

/// Cap on result items examined per extraction pass. Unbounded crawling is
/// out of scope; runs must stay predictable.
pub const RESULT_CAP: usize = 5;
/// Cap on search terms issued per source per run.
pub const TERM_CAP: usize = 3;

const SNIPPET_LIMIT: usize = 300;

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d{1,6}\s+[A-Za-z0-9.' -]{2,50}\s(?:st|street|ave|avenue|blvd|boulevard|dr|drive|rd|road|ln|lane|way|ct|court|pl|place|ter|terrace|cir|circle)\b",
    )
    .expect("valid regex")
});

/// One extraction capability per special type. Implementations own their
/// internal pacing and per-item error recovery; they only return an error
/// when the source's entry point cannot be reached at all.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(
        &self,
        session: &FetchSession,
        source: &SourceDescriptor,
        config: &Config,
    ) -> Result<Vec<RawRecord>, SourceError>;
}

/// Maps `special_type` tags to strategies, with an explicit default for
/// absent or unrecognized tags. New strategies register here without the
/// orchestrator changing.
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn ExtractionStrategy>>,
    default: Arc<dyn ExtractionStrategy>,
}

impl StrategyRegistry {
    pub fn new(default: Arc<dyn ExtractionStrategy>) -> Self {
        Self {
            strategies: HashMap::new(),
            default,
        }
    }

    /// The built-in strategy set: map search, directory listing, paginated
    /// list, and the generic fallback.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new(Arc::new(GenericStrategy));
        registry.register("mapSearch", Arc::new(MapSearchStrategy));
        registry.register("directoryListing", Arc::new(DirectoryListingStrategy));
        registry.register("paginatedList", Arc::new(PaginatedListStrategy));
        registry
    }

    pub fn register(&mut self, special_type: &str, strategy: Arc<dyn ExtractionStrategy>) {
        self.strategies.insert(special_type.to_string(), strategy);
    }

    pub fn resolve(&self, special_type: Option<&str>) -> Arc<dyn ExtractionStrategy> {
        special_type
            .and_then(|tag| self.strategies.get(tag))
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.default))
    }
}

/// Pull up to `cap` records out of a listing page. Tries the source's own
/// result selector first, then generic listing shapes. A page with no
/// recognizable structure yields an empty list, never an error.
pub fn extract_listing_records(
    html: &str,
    selectors: Option<&Selectors>,
    cap: usize,
) -> Vec<RawRecord> {
    let document = Html::parse_document(html);

    let mut candidates: Vec<String> = Vec::new();
    if let Some(info) = selectors.and_then(|s| s.result_info.as_deref()) {
        candidates.push(info.to_string());
    }
    if let Some(list) = selectors.and_then(|s| s.results_list.as_deref()) {
        // Treat the results container's direct children as result blocks.
        candidates.push(format!("{} > *", list));
    }
    candidates.extend([".search-result", ".result", ".listing", "article"].map(String::from));

    for css in candidates {
        let Ok(selector) = Selector::parse(&css) else {
            continue;
        };
        let records: Vec<RawRecord> = document
            .select(&selector)
            .filter_map(record_from_block)
            .take(cap)
            .collect();
        if !records.is_empty() {
            return records;
        }
    }
    Vec::new()
}

fn record_from_block(block: ElementRef) -> Option<RawRecord> {
    let name = block_name(&block)?;

    let text = block
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let contact = extract_contact_info(&text);
    let website = block_website(&block);
    let address = ADDRESS_RE.find(&text).map(|m| m.as_str().to_string());
    let snippet = text.chars().take(SNIPPET_LIMIT).collect::<String>();

    Some(RawRecord {
        name,
        address,
        phone: contact.phone,
        email: contact.email,
        website,
        snippet: Some(snippet),
    })
}

fn block_name(block: &ElementRef) -> Option<String> {
    let heading = Selector::parse("h1, h2, h3, h4, .name, a").unwrap();
    block
        .select(&heading)
        .map(|el| {
            el.text()
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .find(|name| !name.is_empty())
}

fn block_website(block: &ElementRef) -> Option<String> {
    let link = Selector::parse("a[href]").unwrap();
    block
        .select(&link)
        .filter_map(|el| el.value().attr("href"))
        .find(|href| href.starts_with("http://") || href.starts_with("https://"))
        .map(str::to_string)
}

/// Build a query-string search URL off the source's base URL. Falls back to
/// the base itself when it does not parse.
pub fn search_url(base: &str, param: &str, term: &str) -> String {
    match Url::parse(base) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair(param, term);
            url.to_string()
        }
        Err(_) => base.to_string(),
    }
}

/// Build a path-style search URL (`<base>/search/<term>`), the shape map
/// searches use.
pub fn path_search_url(base: &str, term: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(term.as_bytes()).collect();
    format!("{}/search/{}", base.trim_end_matches('/'), encoded)
}

/// Find the next-page link on a listing page and resolve it against the
/// current page URL. Tries the source's pagination selector, then common
/// shapes.
pub fn next_page_url(html: &str, selectors: Option<&Selectors>, current_url: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let mut candidates: Vec<&str> = Vec::new();
    if let Some(next) = selectors.and_then(|s| s.pagination_next.as_deref()) {
        candidates.push(next);
    }
    candidates.extend(["a[rel=\"next\"]", "a.next", ".pagination-next"]);

    for css in candidates {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        for element in document.select(&selector) {
            let href = element.value().attr("href").or_else(|| {
                let link = Selector::parse("a[href]").unwrap();
                element
                    .select(&link)
                    .next()
                    .and_then(|a| a.value().attr("href"))
            });
            if let Some(href) = href {
                if let Some(resolved) = resolve_href(href, current_url) {
                    return Some(resolved);
                }
            }
        }
    }
    None
}

fn resolve_href(href: &str, base_url: &str) -> Option<String> {
    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => Url::parse(base_url)
            .ok()?
            .join(href)
            .ok()
            .map(|u| u.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <div class="directory-results">
            <div class="listing">
              <h3>Lakeside HOA</h3>
              <p>1200 Lake Shore Dr, Miami FL</p>
              <p>Call (305) 555-1234 or board@lakeside.org</p>
              <a href="https://lakeside.example.org">Website</a>
            </div>
            <div class="listing">
              <h3>Sunset Property Management</h3>
              <p>77 Sunset Blvd</p>
            </div>
            <div class="listing"><p>no heading here</p></div>
          </div>
          <a class="next" href="/page/2">Next</a>
        </body></html>
    "#;

    #[test]
    fn extracts_bounded_records_with_contact_fields() {
        let records = extract_listing_records(LISTING, None, RESULT_CAP);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Lakeside HOA");
        assert_eq!(records[0].phone.as_deref(), Some("(305) 555-1234"));
        assert_eq!(records[0].email.as_deref(), Some("board@lakeside.org"));
        assert_eq!(records[0].website.as_deref(), Some("https://lakeside.example.org"));
        assert!(records[0].address.as_deref().unwrap().contains("1200 Lake Shore Dr"));
        assert_eq!(records[1].name, "Sunset Property Management");
        assert!(records[1].email.is_none());
    }

    #[test]
    fn cap_limits_extracted_records() {
        let blocks: String = (0..20)
            .map(|i| format!("<div class=\"listing\"><h3>Entity {i}</h3></div>"))
            .collect();
        let html = format!("<html><body>{blocks}</body></html>");
        let records = extract_listing_records(&html, None, RESULT_CAP);
        assert_eq!(records.len(), RESULT_CAP);
        assert_eq!(records[0].name, "Entity 0");
    }

    #[test]
    fn source_selector_takes_priority_over_generic_shapes() {
        let selectors = Selectors {
            results_list: None,
            result_info: Some(".listing".to_string()),
            pagination_next: None,
        };
        let records = extract_listing_records(LISTING, Some(&selectors), RESULT_CAP);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn unrecognized_page_structure_yields_empty_list() {
        let records = extract_listing_records("<html><body><p>maintenance</p></body></html>", None, 5);
        assert!(records.is_empty());
    }

    #[test]
    fn next_page_link_resolves_relative_hrefs() {
        let next = next_page_url(LISTING, None, "https://example.com/page/1");
        assert_eq!(next.as_deref(), Some("https://example.com/page/2"));
    }

    #[test]
    fn search_url_builders_encode_terms() {
        assert_eq!(
            search_url("https://example.com/dir", "q", "property management"),
            "https://example.com/dir?q=property+management"
        );
        assert_eq!(
            path_search_url("https://maps.example.com/", "hoa miami"),
            "https://maps.example.com/search/hoa+miami"
        );
    }

    #[test]
    fn registry_resolves_known_tags_and_falls_back_to_default() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(registry.resolve(Some("mapSearch")).name(), "mapSearch");
        assert_eq!(registry.resolve(Some("paginatedList")).name(), "paginatedList");
        assert_eq!(registry.resolve(Some("somethingElse")).name(), "generic");
        assert_eq!(registry.resolve(None).name(), "generic");
    }
}
